//! Execution event bus and subscriber contract.

pub mod bus;

pub use bus::{ExecutionEventBus, ExecutionEventSubscriber};
