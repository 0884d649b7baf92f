//! Operator command line built on clap.
//!
//! Defines [`Cli`] with the [`Command`] subcommands and the global flags
//! (--config, --fixtures, --policy, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::feedback::Recipients;
use crate::state_machine::{AppraisalResult, Event, GuardPolicy, OrderState, RecipientKind};

/// orderflow — drive orders through appraisal and fulfillment.
#[derive(Debug, Parser)]
#[command(name = "orderflow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file to read instead of ./orderflow.toml.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Order fixture file; overrides config and environment.
    #[arg(long, global = true)]
    pub fixtures: Option<PathBuf>,

    /// Guard policy for transitions.
    #[arg(long, global = true)]
    pub policy: Option<PolicyArg>,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Uniform guard: Appraised, Shipped or Delivered.
    Observed,
    /// Each action requires its preceding step.
    Sequential,
}

impl From<PolicyArg> for GuardPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Observed => GuardPolicy::Observed,
            PolicyArg::Sequential => GuardPolicy::Sequential,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EventArg {
    Accept,
    Reject,
    HandOver,
    Appraise,
    Ship,
    Deliver,
}

impl From<EventArg> for Event {
    fn from(arg: EventArg) -> Self {
        match arg {
            EventArg::Accept => Event::Accept,
            EventArg::Reject => Event::Reject,
            EventArg::HandOver => Event::HandOver,
            EventArg::Appraise => Event::Appraise,
            EventArg::Ship => Event::Ship,
            EventArg::Deliver => Event::Deliver,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ResultArg {
    Passed,
    Failed,
}

impl From<ResultArg> for AppraisalResult {
    fn from(arg: ResultArg) -> Self {
        match arg {
            ResultArg::Passed => AppraisalResult::Passed,
            ResultArg::Failed => AppraisalResult::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecipientArg {
    Customer,
    Seller,
    /// Clears the selection.
    None,
}

impl RecipientArg {
    fn kind(self) -> Option<RecipientKind> {
        match self {
            RecipientArg::Customer => Some(RecipientKind::Customer),
            RecipientArg::Seller => Some(RecipientKind::Seller),
            RecipientArg::None => None,
        }
    }
}

/// Folds repeated `--to` values into a recipient selection.
pub fn recipients(args: &[RecipientArg]) -> Recipients {
    let kinds: Vec<RecipientKind> = args.iter().filter_map(|a| a.kind()).collect();
    Recipients::from_kinds(&kinds)
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lists orders with their status.
    List {
        /// Only orders in this status, e.g. "handed-over" or "Shipped".
        #[arg(long)]
        status: Option<OrderState>,
    },

    /// Shows one order: status, progress and the actions on offer.
    Show {
        order_id: String,
    },

    /// Requests a lifecycle transition.
    Transition {
        order_id: String,

        #[arg(value_enum)]
        event: EventArg,

        /// Appraisal result, required for `appraise`.
        #[arg(long, value_enum)]
        result: Option<ResultArg>,
    },

    /// Sends feedback about an order.
    Feedback {
        order_id: String,

        message: String,

        /// Recipient; repeat for several, `none` for no recipient.
        #[arg(long = "to", value_enum, default_values_t = [RecipientArg::Customer])]
        to: Vec<RecipientArg>,
    },

    /// Prints an order's notification feed.
    Notifications {
        order_id: String,
    },

    /// Runs the built-in lifecycle walkthrough on an in-memory order.
    Demo,
}
