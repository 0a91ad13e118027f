//! 基础设施层
//!
//! 持有稀缺资源（Page），只暴露页面操作能力，不认识 AttendeeRecord

pub mod page_driver;

#[cfg(test)]
pub mod mock;

pub use page_driver::{CdpDriver, PageDriver};
