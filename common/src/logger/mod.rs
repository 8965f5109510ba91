mod init;
mod slow;
mod spans;
mod trace_id;

pub use init::init_logger;
pub use slow::warn_if_slow;
pub use spans::root_span;
pub use trace_id::TraceId;
