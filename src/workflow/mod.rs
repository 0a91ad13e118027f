pub mod attendee_ctx;
pub mod attendee_flow;

pub use attendee_ctx::AttendeeCtx;
pub use attendee_flow::{AttendeeFlow, RecordError, SubmitStep};
