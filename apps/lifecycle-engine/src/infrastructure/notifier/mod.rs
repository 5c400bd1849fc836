//! Event notifier adapters.

mod broadcast;
mod tracing_notifier;

pub use broadcast::BroadcastEventNotifier;
pub use tracing_notifier::TracingEventNotifier;
