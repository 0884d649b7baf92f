//! Order storage collaborator.
//!
//! [`OrderStore`] is the seam between the workflow and wherever orders live.
//! [`InMemoryOrderStore`] keeps them in a `Vec` and can be loaded from, and
//! saved back to, a JSON fixture file.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::OrderflowError;
use crate::state_machine::{AppraisalResult, Notification, Order, OrderState, RecipientKind};

/// Supplies orders and accepts commands against them.
///
/// Commands are fire-and-forget: an unknown id is logged and ignored.
pub trait OrderStore {
    fn orders(&self) -> &[Order];

    /// `true` until order data is ready.
    fn is_loading(&self) -> bool;

    fn update_order_status(
        &mut self,
        order_id: &str,
        status: OrderState,
        appraisal: Option<AppraisalResult>,
    );

    fn send_feedback(&mut self, order_id: &str, message: &str, recipient: RecipientKind);

    fn append_notification(&mut self, order_id: &str, notification: Notification);

    fn find(&self, order_id: &str) -> Option<&Order> {
        self.orders()
            .iter()
            .find(|o| o.order_id.as_str() == order_id)
    }
}

/// A message handed to the store for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentFeedback {
    pub order_id: String,
    pub message: String,
    pub recipient: RecipientKind,
}

#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: Vec<Order>,
    loading: bool,
    outbox: Vec<SentFeedback>,
}

impl InMemoryOrderStore {
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            orders,
            loading: false,
            outbox: Vec::new(),
        }
    }

    /// An empty store whose data has not arrived yet.
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Read a JSON array of orders.
    pub fn load(path: &Path) -> Result<Self, OrderflowError> {
        let contents = fs::read_to_string(path)?;
        let orders: Vec<Order> = serde_json::from_str(&contents)?;
        debug!(path = %path.display(), count = orders.len(), "loaded orders");
        Ok(Self::new(orders))
    }

    /// Write all orders back as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), OrderflowError> {
        let json = serde_json::to_string_pretty(&self.orders)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), count = self.orders.len(), "saved orders");
        Ok(())
    }

    /// Feedback handed to this store, oldest first.
    pub fn sent_feedback(&self) -> &[SentFeedback] {
        &self.outbox
    }

    fn find_mut(&mut self, order_id: &str) -> Option<&mut Order> {
        let found = self
            .orders
            .iter_mut()
            .find(|o| o.order_id.as_str() == order_id);
        if found.is_none() {
            warn!(order_id, "command for unknown order ignored");
        }
        found
    }
}

impl OrderStore for InMemoryOrderStore {
    fn orders(&self) -> &[Order] {
        &self.orders
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn update_order_status(
        &mut self,
        order_id: &str,
        status: OrderState,
        appraisal: Option<AppraisalResult>,
    ) {
        if let Some(order) = self.find_mut(order_id) {
            order.order_status = status;
            if appraisal.is_some() {
                order.appraised_status = appraisal;
            }
        }
    }

    fn send_feedback(&mut self, order_id: &str, message: &str, recipient: RecipientKind) {
        if self.find_mut(order_id).is_none() {
            return;
        }
        self.outbox.push(SentFeedback {
            order_id: order_id.to_string(),
            message: message.to_string(),
            recipient,
        });
    }

    fn append_notification(&mut self, order_id: &str, notification: Notification) {
        if let Some(order) = self.find_mut(order_id) {
            order.notifications.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryOrderStore {
        InMemoryOrderStore::new(vec![
            Order::new("1", OrderState::Pending),
            Order::new("2", OrderState::Appraised),
        ])
    }

    #[test]
    fn find_by_textual_id() {
        let s = store();
        assert_eq!(s.find("2").unwrap().order_status, OrderState::Appraised);
        assert!(s.find("3").is_none());
    }

    #[test]
    fn update_keeps_previous_appraisal_when_none_given() {
        let mut s = store();
        s.update_order_status("2", OrderState::Appraised, Some(AppraisalResult::Passed));
        s.update_order_status("2", OrderState::Shipped, None);
        let order = s.find("2").unwrap();
        assert_eq!(order.order_status, OrderState::Shipped);
        assert_eq!(order.appraised_status, Some(AppraisalResult::Passed));
    }

    #[test]
    fn commands_for_unknown_orders_are_ignored() {
        let mut s = store();
        s.update_order_status("404", OrderState::Shipped, None);
        s.send_feedback("404", "hello", RecipientKind::Customer);
        s.append_notification("404", Notification::status("x"));
        assert!(s.sent_feedback().is_empty());
        assert!(s.orders().iter().all(|o| o.notifications.is_empty()));
    }

    #[test]
    fn loading_store_reports_loading() {
        let s = InMemoryOrderStore::loading();
        assert!(s.is_loading());
        assert!(s.orders().is_empty());
        assert!(!store().is_loading());
    }

    #[test]
    fn load_and_save_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        fs::write(
            &path,
            r#"[{"orderId": 1001, "orderStatus": "Shipped", "customerName": "Lin"}]"#,
        )
        .unwrap();

        let mut s = InMemoryOrderStore::load(&path).unwrap();
        s.update_order_status("1001", OrderState::Delivered, None);
        s.save(&path).unwrap();

        let reloaded = InMemoryOrderStore::load(&path).unwrap();
        let order = reloaded.find("1001").unwrap();
        assert_eq!(order.order_status, OrderState::Delivered);
        assert_eq!(order.customer_name.as_deref(), Some("Lin"));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            InMemoryOrderStore::load(&path),
            Err(OrderflowError::Json(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            InMemoryOrderStore::load(&dir.path().join("nope.json")),
            Err(OrderflowError::Io(_))
        ));
    }
}
