//! Order aggregate root.
//!
//! The Order aggregate owns the full lifecycle of an order from submission
//! through execution, cancellation, or expiration. Transitions are
//! validated against the state machine and emit domain events; terminal
//! orders are retained for history and never reactivated.

use serde::{Deserialize, Serialize};

use crate::domain::orders::errors::OrderError;
use crate::domain::orders::events::{
    OrderCancelled, OrderCreated, OrderEvent, OrderExecuted, OrderExecutionFailed, OrderExpired,
    OrderTriggered,
};
use crate::domain::orders::services::OrderStateMachine;
use crate::domain::orders::value_objects::{
    CancelReason, ConditionalTrigger, OrderFill, OrderSide, OrderStatus, OrderTerms, OrderType,
    Termination, TimeInForce, TrailingState,
};
use crate::domain::shared::{Money, OcoGroupId, OrderId, PortfolioId, Quantity, Symbol, Timestamp};

/// Command to create a new order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    /// Portfolio the order trades against.
    pub portfolio_id: PortfolioId,
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Order side.
    pub side: OrderSide,
    /// Per-type pricing terms.
    pub terms: OrderTerms,
    /// Quantity to trade.
    pub quantity: Quantity,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Optional expiry date; expired orders are swept by the scheduler.
    pub expiry_date: Option<Timestamp>,
    /// Entry order this order belongs to (bracket children).
    pub parent_order_id: Option<OrderId>,
    /// One-cancels-other group this order belongs to.
    pub oco_group_id: Option<OcoGroupId>,
}

impl OrderDraft {
    /// Collect every validation violation for this draft.
    ///
    /// All violated rules are reported, not just the first.
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();

        if let Err(e) = self.symbol.validate() {
            out.push(e.to_string());
        }
        if let Err(e) = self.quantity.validate_for_order() {
            out.push(e.to_string());
        }
        for e in self.terms.violations(self.side) {
            out.push(e.to_string());
        }

        out
    }
}

/// Order aggregate root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    portfolio_id: PortfolioId,
    symbol: Symbol,
    side: OrderSide,
    terms: OrderTerms,
    quantity: Quantity,
    time_in_force: TimeInForce,
    status: OrderStatus,
    parent_order_id: Option<OrderId>,
    oco_group_id: Option<OcoGroupId>,
    trailing: Option<TrailingState>,
    expiry_date: Option<Timestamp>,
    fill: Option<OrderFill>,
    termination: Option<Termination>,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[serde(skip)]
    events: Vec<OrderEvent>,
}

impl Order {
    /// Create a new pending order from a draft.
    ///
    /// Generates an `OrderCreated` event.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` listing every violated rule.
    pub fn submit(draft: OrderDraft) -> Result<Self, OrderError> {
        let violations = draft.violations();
        if !violations.is_empty() {
            return Err(OrderError::Validation { violations });
        }

        let id = OrderId::generate();
        let now = Timestamp::now();

        let mut order = Self {
            id: id.clone(),
            portfolio_id: draft.portfolio_id.clone(),
            symbol: draft.symbol.clone(),
            side: draft.side,
            terms: draft.terms,
            quantity: draft.quantity,
            time_in_force: draft.time_in_force,
            status: OrderStatus::Pending,
            parent_order_id: draft.parent_order_id,
            oco_group_id: draft.oco_group_id,
            trailing: None,
            expiry_date: draft.expiry_date,
            fill: None,
            termination: None,
            created_at: now,
            updated_at: now,
            events: Vec::new(),
        };

        order.events.push(OrderEvent::Created(OrderCreated {
            order_id: id,
            portfolio_id: draft.portfolio_id,
            symbol: draft.symbol,
            side: draft.side,
            order_type: order.terms.order_type(),
            quantity: draft.quantity,
            occurred_at: now,
        }));

        Ok(order)
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// Get the order id.
    #[must_use]
    pub const fn id(&self) -> &OrderId {
        &self.id
    }

    /// Get the portfolio id.
    #[must_use]
    pub const fn portfolio_id(&self) -> &PortfolioId {
        &self.portfolio_id
    }

    /// Get the symbol.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Get the order side.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Get the pricing terms.
    #[must_use]
    pub const fn terms(&self) -> &OrderTerms {
        &self.terms
    }

    /// Get the fieldless order type tag.
    #[must_use]
    pub const fn order_type(&self) -> OrderType {
        self.terms.order_type()
    }

    /// Get the quantity.
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Get the time in force.
    #[must_use]
    pub const fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Get the parent (bracket entry) order id.
    #[must_use]
    pub const fn parent_order_id(&self) -> Option<&OrderId> {
        self.parent_order_id.as_ref()
    }

    /// Get the OCO group id.
    #[must_use]
    pub const fn oco_group_id(&self) -> Option<&OcoGroupId> {
        self.oco_group_id.as_ref()
    }

    /// Get the trailing-stop derived state, if seeded.
    #[must_use]
    pub const fn trailing(&self) -> Option<&TrailingState> {
        self.trailing.as_ref()
    }

    /// Get the expiry date.
    #[must_use]
    pub const fn expiry_date(&self) -> Option<Timestamp> {
        self.expiry_date
    }

    /// Get the fill details (set only at `Executed`).
    #[must_use]
    pub const fn fill(&self) -> Option<&OrderFill> {
        self.fill.as_ref()
    }

    /// Get the termination details (set only at `Cancelled`/`Expired`).
    #[must_use]
    pub const fn termination(&self) -> Option<&Termination> {
        self.termination.as_ref()
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Get the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Conditional triggers carried by this order (empty for non-conditional
    /// types).
    #[must_use]
    pub fn conditional_triggers(&self) -> &[ConditionalTrigger] {
        match &self.terms {
            OrderTerms::Conditional { triggers } => triggers,
            _ => &[],
        }
    }

    /// Returns true if the order's expiry date has passed.
    #[must_use]
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expiry_date.is_some_and(|expiry| expiry < now)
    }

    // ========================================================================
    // State transitions
    // ========================================================================

    /// Arm a two-phase order: `Pending -> Triggered`.
    ///
    /// Generates an `OrderTriggered` event.
    ///
    /// # Errors
    ///
    /// Returns error if the order is not pending.
    pub fn mark_triggered(&mut self, trigger_price: Money) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, OrderStatus::Triggered)?;

        self.status = OrderStatus::Triggered;
        self.updated_at = Timestamp::now();

        self.events.push(OrderEvent::Triggered(OrderTriggered {
            order_id: self.id.clone(),
            trigger_price,
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    /// Record a fill: `Pending | Triggered -> Executed`.
    ///
    /// Generates an `OrderExecuted` event.
    ///
    /// # Errors
    ///
    /// Returns error if the order is terminal.
    pub fn execute(&mut self, fill: OrderFill) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, OrderStatus::Executed)?;

        self.status = OrderStatus::Executed;
        self.updated_at = Timestamp::now();

        self.events.push(OrderEvent::Executed(OrderExecuted {
            order_id: self.id.clone(),
            executed_price: fill.executed_price,
            executed_quantity: fill.executed_quantity,
            commission: fill.commission,
            occurred_at: self.updated_at,
        }));

        self.fill = Some(fill);

        Ok(())
    }

    /// Cancel the order: `Pending | Triggered -> Cancelled`.
    ///
    /// Generates an `OrderCancelled` event.
    ///
    /// # Errors
    ///
    /// Returns error if the order is terminal.
    pub fn cancel(&mut self, reason: CancelReason) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, OrderStatus::Cancelled)?;

        self.status = OrderStatus::Cancelled;
        self.updated_at = Timestamp::now();
        self.termination = Some(Termination {
            cancelled_at: self.updated_at,
            reason: reason.message.clone(),
        });

        self.events.push(OrderEvent::Cancelled(OrderCancelled {
            order_id: self.id.clone(),
            reason,
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    /// Terminally cancel the order after a failed execution attempt.
    ///
    /// Execution is never retried; the caller must resubmit. Generates an
    /// `OrderExecutionFailed` event.
    ///
    /// # Errors
    ///
    /// Returns error if the order is terminal.
    pub fn fail_execution(&mut self, message: &str) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, OrderStatus::Cancelled)?;

        let reason = CancelReason::execution_failed(message);
        self.status = OrderStatus::Cancelled;
        self.updated_at = Timestamp::now();
        self.termination = Some(Termination {
            cancelled_at: self.updated_at,
            reason: reason.message,
        });

        self.events
            .push(OrderEvent::ExecutionFailed(OrderExecutionFailed {
                order_id: self.id.clone(),
                message: message.to_string(),
                occurred_at: self.updated_at,
            }));

        Ok(())
    }

    /// Expire the order: `Pending | Triggered -> Expired`.
    ///
    /// Generates an `OrderExpired` event.
    ///
    /// # Errors
    ///
    /// Returns error if the order is terminal.
    pub fn expire(&mut self) -> Result<(), OrderError> {
        OrderStateMachine::validate_transition(self.status, OrderStatus::Expired)?;

        self.status = OrderStatus::Expired;
        self.updated_at = Timestamp::now();
        self.termination = Some(Termination {
            cancelled_at: self.updated_at,
            reason: CancelReason::expired().message,
        });

        self.events.push(OrderEvent::Expired(OrderExpired {
            order_id: self.id.clone(),
            occurred_at: self.updated_at,
        }));

        Ok(())
    }

    /// Fold a price observation into the trailing-stop state.
    ///
    /// Seeds the state on the first observation. Returns true if the
    /// high-water mark or stop price moved; callers persist the change
    /// through the same compare-and-set discipline as status transitions.
    /// No-op for non-trailing orders.
    pub fn update_trailing(&mut self, price: Money) -> bool {
        let OrderTerms::TrailingStop { trail } = &self.terms else {
            return false;
        };

        match &mut self.trailing {
            Some(state) => {
                let changed = state.observe(price, trail);
                if changed {
                    self.updated_at = Timestamp::now();
                }
                changed
            }
            None => {
                self.trailing = Some(TrailingState::seed(price, trail));
                self.updated_at = Timestamp::now();
                true
            }
        }
    }

    /// Drafts for the stop-loss and take-profit children of a bracket entry.
    ///
    /// Children reference this order through `parent_order_id` and are
    /// persisted as independent pending orders at submission time; all three
    /// race the market simultaneously.
    #[must_use]
    pub fn bracket_child_drafts(&self) -> Option<(OrderDraft, OrderDraft)> {
        let OrderTerms::Bracket {
            take_profit,
            stop_loss,
        } = self.terms
        else {
            return None;
        };

        let child = |terms: OrderTerms| OrderDraft {
            portfolio_id: self.portfolio_id.clone(),
            symbol: self.symbol.clone(),
            side: OrderSide::Sell,
            terms,
            quantity: self.quantity,
            time_in_force: self.time_in_force,
            expiry_date: self.expiry_date,
            parent_order_id: Some(self.id.clone()),
            oco_group_id: None,
        };

        Some((
            child(OrderTerms::TakeProfit {
                trigger_price: take_profit,
            }),
            child(OrderTerms::StopLoss {
                stop_price: stop_loss,
            }),
        ))
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Drain accumulated domain events.
    pub fn drain_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get pending events without draining.
    #[must_use]
    pub fn pending_events(&self) -> &[OrderEvent] {
        &self.events
    }
}
