//! Shared domain building blocks.
//!
//! Value objects and errors used across the order lifecycle domain.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::{
    FillId, Money, OcoGroupId, OrderId, PortfolioId, Quantity, Symbol, Timestamp,
};
