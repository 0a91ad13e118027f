//! 业务能力层

pub mod failure_writer;

pub use failure_writer::FailureWriter;
