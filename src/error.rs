use thiserror::Error;

use crate::state_machine::{Event, OrderState};

/// A requested transition does not apply to the order's current status.
/// The order is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Order is in the \"{state}\" stage. No further action is accepted.")]
    Terminal { state: OrderState },

    #[error("Cannot {} from the current status ({state}).", .event.verb())]
    NotPermitted { event: Event, state: OrderState },

    #[error("Please select whether the order has passed or failed appraisal.")]
    MissingAppraisalResult,
}

/// The feedback form is incomplete. Nothing is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select at least one recipient.")]
    NoRecipient,

    #[error("Feedback message cannot be empty.")]
    EmptyMessage,
}

#[derive(Debug, Error)]
pub enum OrderflowError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Order data is still loading")]
    Loading,

    #[error("Invalid action: {0}")]
    Transition(#[from] TransitionError),

    #[error("Invalid feedback: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_display() {
        let err = TransitionError::NotPermitted {
            event: Event::Ship,
            state: OrderState::Pending,
        };
        assert_eq!(
            err.to_string(),
            "Cannot mark as shipped from the current status (Pending)."
        );

        let err = TransitionError::Terminal {
            state: OrderState::Delivered,
        };
        assert_eq!(
            err.to_string(),
            "Order is in the \"Delivered\" stage. No further action is accepted."
        );
    }

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err: OrderflowError = ValidationError::EmptyMessage.into();
        assert_eq!(err.to_string(), "Invalid feedback: Feedback message cannot be empty.");

        let err = OrderflowError::NotFound("A-9".into());
        assert_eq!(err.to_string(), "Order not found: A-9");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OrderflowError>();
    }
}
