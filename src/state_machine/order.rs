use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::state::OrderState;

/// Order identifier. Fixtures may carry it as a JSON string or integer;
/// both are kept in their textual form so lookups compare like with like.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OrderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => OrderId(s),
            RawId::Unsigned(n) => OrderId(n.to_string()),
            RawId::Signed(n) => OrderId(n.to_string()),
        })
    }
}

/// Outcome of the manual appraisal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppraisalResult {
    Passed,
    Failed,
}

impl fmt::Display for AppraisalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppraisalResult::Passed => write!(f, "passed"),
            AppraisalResult::Failed => write!(f, "failed"),
        }
    }
}

/// Who a feedback message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientKind {
    Customer,
    Seller,
}

impl fmt::Display for RecipientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipientKind::Customer => write!(f, "customer"),
            RecipientKind::Seller => write!(f, "seller"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Status,
    Feedback,
}

/// An entry in an order's notification feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default = "new_notification_id")]
    pub id: String,
    #[serde(default)]
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<RecipientKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn new_notification_id() -> String {
    Uuid::new_v4().to_string()
}

impl Notification {
    pub fn status(message: impl Into<String>) -> Self {
        Self {
            id: new_notification_id(),
            kind: NotificationKind::Status,
            message: message.into(),
            recipient: None,
            created_at: Some(Utc::now()),
        }
    }

    pub fn feedback(recipient: RecipientKind, message: impl Into<String>) -> Self {
        Self {
            id: new_notification_id(),
            kind: NotificationKind::Feedback,
            message: message.into(),
            recipient: Some(recipient),
            created_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub total_price: f64,
}

/// A customer purchase tracked through appraisal and fulfillment.
///
/// Only `order_status`, `appraised_status` and `notifications` are ever
/// changed by this crate; everything else is carried through as loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    #[serde(default)]
    pub order_status: OrderState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appraised_status: Option<AppraisalResult>,
    #[serde(default)]
    pub notifications: Vec<Notification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub shipping_charges: f64,
    #[serde(default)]
    pub taxes: f64,
    #[serde(default)]
    pub discounts: f64,
    #[serde(default)]
    pub grand_total: f64,

    /// Fixture fields this crate does not model (transit details etc).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Order {
    /// A bare order in the given status, with no descriptive data.
    pub fn new(order_id: impl Into<String>, order_status: OrderState) -> Self {
        Self {
            order_id: OrderId::new(order_id),
            order_status,
            appraised_status: None,
            notifications: Vec::new(),
            order_date: None,
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            seller_name: None,
            billing_address: None,
            shipping_address: None,
            shipping_method: None,
            payment_method: None,
            payment_status: None,
            transaction_id: None,
            items: Vec::new(),
            subtotal: 0.0,
            shipping_charges: 0.0,
            taxes: 0.0,
            discounts: 0.0,
            grand_total: 0.0,
            extra: serde_json::Map::new(),
        }
    }
}
