//! Application use cases: the engine's exposed operations.

mod cancel_order;
mod modify_order;
mod order_queries;
mod submit_order;

pub use cancel_order::CancelOrderUseCase;
pub use modify_order::{ModifyOrderUseCase, OrderUpdate};
pub use order_queries::OrderQueries;
pub use submit_order::SubmitOrderUseCase;
