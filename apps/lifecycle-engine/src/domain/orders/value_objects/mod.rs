//! Value objects of the order lifecycle domain.

mod conditional;
mod fill;
mod order_side;
mod order_status;
mod quote;
mod reasons;
mod terms;
mod time_in_force;

pub use conditional::{ConditionalTrigger, LogicalOperator, TriggerCondition, TriggerField};
pub use fill::{OrderFill, Termination};
pub use order_side::OrderSide;
pub use order_status::OrderStatus;
pub use quote::Quote;
pub use reasons::CancelReason;
pub use terms::{OrderTerms, OrderType, Trail, TrailingState};
pub use time_in_force::TimeInForce;
