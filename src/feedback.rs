use tracing::{info, warn};

use crate::error::{OrderflowError, ValidationError};
use crate::state_machine::{Notification, RecipientKind};
use crate::store::OrderStore;

/// Which parties a feedback message goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipients {
    pub customer: bool,
    pub seller: bool,
}

impl Default for Recipients {
    fn default() -> Self {
        Self {
            customer: true,
            seller: false,
        }
    }
}

impl Recipients {
    pub fn none() -> Self {
        Self {
            customer: false,
            seller: false,
        }
    }

    pub fn from_kinds(kinds: &[RecipientKind]) -> Self {
        Self {
            customer: kinds.contains(&RecipientKind::Customer),
            seller: kinds.contains(&RecipientKind::Seller),
        }
    }

    /// Selected recipients, customer first.
    pub fn selected(&self) -> Vec<RecipientKind> {
        let mut out = Vec::with_capacity(2);
        if self.customer {
            out.push(RecipientKind::Customer);
        }
        if self.seller {
            out.push(RecipientKind::Seller);
        }
        out
    }
}

/// Validates feedback and hands one message per recipient to the store.
pub struct FeedbackDispatch;

impl FeedbackDispatch {
    /// Check the form before anything is sent. Recipients are checked first.
    pub fn validate(message: &str, recipients: Recipients) -> Result<(), ValidationError> {
        if !recipients.customer && !recipients.seller {
            return Err(ValidationError::NoRecipient);
        }
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        Ok(())
    }

    /// Returns the recipients the message was dispatched to. Delivery itself
    /// belongs to the store.
    pub fn send_feedback<S: OrderStore>(
        store: &mut S,
        order_id: &str,
        message: &str,
        recipients: Recipients,
    ) -> Result<Vec<RecipientKind>, OrderflowError> {
        Self::validate(message, recipients).inspect_err(|e| {
            warn!(order_id, error = %e, "feedback rejected");
        })?;

        if store.is_loading() {
            return Err(OrderflowError::Loading);
        }
        if store.find(order_id).is_none() {
            return Err(OrderflowError::NotFound(order_id.to_string()));
        }

        let sent = recipients.selected();
        for recipient in &sent {
            store.send_feedback(order_id, message, *recipient);
            store.append_notification(
                order_id,
                Notification::feedback(*recipient, format!("Feedback sent to {recipient}: {message}")),
            );
        }
        info!(order_id, recipients = sent.len(), "feedback dispatched");
        Ok(sent)
    }
}
