//! Order lifecycle workflow for an appraisal and fulfillment back-office.
//!
//! [`workflow::OrderWorkflow`] validates and applies status transitions,
//! [`feedback::FeedbackDispatch`] validates and forwards feedback, and both
//! talk to orders only through an injected [`store::OrderStore`].

pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod logging;
pub mod state_machine;
pub mod store;
pub mod ui;
pub mod workflow;

pub use error::{OrderflowError, TransitionError, ValidationError};
pub use feedback::{FeedbackDispatch, Recipients};
pub use state_machine::{AppraisalResult, Event, GuardPolicy, Order, OrderState, StateMachine};
pub use store::{InMemoryOrderStore, OrderStore};
pub use workflow::{OrderView, OrderWorkflow, TransitionOutcome};
