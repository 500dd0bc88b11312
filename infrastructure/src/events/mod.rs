//! Event-bus subscribers.

mod tracing_logger;

pub use tracing_logger::TracingEventLogger;
