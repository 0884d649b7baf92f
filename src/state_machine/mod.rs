mod order;
mod state;

pub use order::{
    AppraisalResult, LineItem, Notification, NotificationKind, Order, OrderId, RecipientKind,
};
pub use state::{Evaluation, Event, GuardPolicy, OrderState, StateMachine};
