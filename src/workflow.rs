use tracing::{info, warn};

use crate::error::OrderflowError;
use crate::state_machine::{
    AppraisalResult, Event, GuardPolicy, Notification, Order, OrderState, StateMachine,
};
use crate::store::OrderStore;

/// What a successful transition did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub order_id: String,
    pub previous: OrderState,
    pub state: OrderState,
    pub appraisal: Option<AppraisalResult>,
    /// The detail view should be left (the order was rejected).
    pub navigate_away: bool,
    /// Operator-facing confirmation, also appended as a notification.
    pub message: String,
}

/// Snapshot of an order for a presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub order: Order,
    pub state: OrderState,
    pub appraised_status: Option<AppraisalResult>,
    /// Stepper position; off-path states render at the first step.
    pub step_index: usize,
    pub offered_actions: Vec<Event>,
}

/// Drives orders through the lifecycle against an injected store.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderWorkflow {
    pub policy: GuardPolicy,
}

fn confirmation(event: Event, next: OrderState) -> &'static str {
    match (event, next) {
        (Event::Accept, _) => "You have accepted the order successfully.",
        (Event::Reject, _) => "You have rejected the order.",
        (Event::HandOver, _) => "You have handed over the order.",
        (Event::Appraise, OrderState::Rejected) => {
            "The order failed appraisal and has been rejected."
        }
        (Event::Appraise, _) => "The order has passed appraisal and is ready to be shipped.",
        (Event::Ship, _) => "The order has been marked as shipped.",
        (Event::Deliver, _) => "The order has been marked as delivered.",
    }
}

impl OrderWorkflow {
    pub fn new(policy: GuardPolicy) -> Self {
        Self { policy }
    }

    fn resolve<'a, S: OrderStore>(
        store: &'a S,
        order_id: &str,
    ) -> Result<&'a Order, OrderflowError> {
        if store.is_loading() {
            return Err(OrderflowError::Loading);
        }
        store
            .find(order_id)
            .ok_or_else(|| OrderflowError::NotFound(order_id.to_string()))
    }

    /// Apply `event` to the order, persisting the new status through the store.
    ///
    /// On any error the store is not touched.
    pub fn request_transition<S: OrderStore>(
        &self,
        store: &mut S,
        order_id: &str,
        event: Event,
        appraisal: Option<AppraisalResult>,
    ) -> Result<TransitionOutcome, OrderflowError> {
        let previous = Self::resolve(store, order_id)?.order_status;

        let evaluation = StateMachine::evaluate(self.policy, previous, event, appraisal)
            .inspect_err(|e| {
                warn!(order_id, %event, from = %previous, error = %e, "transition refused");
            })?;

        store.update_order_status(order_id, evaluation.next, evaluation.appraisal);
        let message = confirmation(event, evaluation.next).to_string();
        store.append_notification(order_id, Notification::status(message.clone()));

        info!(
            order_id,
            %event,
            from = %previous,
            to = %evaluation.next,
            navigate_away = evaluation.navigate_away,
            "order transitioned"
        );

        Ok(TransitionOutcome {
            order_id: order_id.to_string(),
            previous,
            state: evaluation.next,
            appraisal: evaluation.appraisal,
            navigate_away: evaluation.navigate_away,
            message,
        })
    }

    /// Current status, appraisal and offered actions for one order.
    pub fn view<S: OrderStore>(store: &S, order_id: &str) -> Result<OrderView, OrderflowError> {
        let order = Self::resolve(store, order_id)?;
        let state = order.order_status;
        Ok(OrderView {
            order: order.clone(),
            state,
            appraised_status: order.appraised_status,
            step_index: state.step_index().unwrap_or(0),
            offered_actions: StateMachine::offered_actions(state),
        })
    }
}
