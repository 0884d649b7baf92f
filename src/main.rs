use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use orderflow::cli::{Cli, Command, recipients};
use orderflow::config::OrderflowConfig;
use orderflow::state_machine::{AppraisalResult, Event, Order, OrderState};
use orderflow::{
    FeedbackDispatch, InMemoryOrderStore, OrderStore, OrderWorkflow, OrderflowError, Recipients,
    logging, ui,
};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => OrderflowConfig::load_from(path)?,
        None => OrderflowConfig::load()?,
    };
    if let Some(path) = cli.fixtures.clone() {
        config.fixtures_path = path;
    }
    if let Some(policy) = cli.policy {
        config.guard_policy = policy.into();
    }

    logging::init(cli.verbose, &config.log_filter);
    debug!(?config, "configuration resolved");

    let workflow = OrderWorkflow::new(config.guard_policy);

    let result = match cli.command {
        Command::Demo => {
            run_demo(workflow);
            Ok(())
        }
        Command::List { status } => {
            let store = open_store(&config)?;
            let orders: Vec<Order> = store
                .orders()
                .iter()
                .filter(|o| status.is_none_or(|s| o.order_status == s))
                .cloned()
                .collect();
            ui::print_order_list(&orders);
            Ok(())
        }
        Command::Show { order_id } => {
            let store = open_store(&config)?;
            OrderWorkflow::view(&store, &order_id).map(|view| ui::print_order_view(&view))
        }
        Command::Notifications { order_id } => {
            let store = open_store(&config)?;
            OrderWorkflow::view(&store, &order_id)
                .map(|view| ui::print_notifications(&view.order.notifications))
        }
        Command::Transition {
            order_id,
            event,
            result,
        } => {
            let mut store = open_store(&config)?;
            match workflow.request_transition(
                &mut store,
                &order_id,
                event.into(),
                result.map(Into::into),
            ) {
                Ok(outcome) => {
                    ui::print_transition(&outcome);
                    persist(&config, &store)?;
                    Ok(())
                }
                Err(err) => Err(err),
            }
        }
        Command::Feedback {
            order_id,
            message,
            to,
        } => {
            let mut store = open_store(&config)?;
            match FeedbackDispatch::send_feedback(&mut store, &order_id, &message, recipients(&to))
            {
                Ok(sent) => {
                    let names: Vec<String> = sent.iter().map(ToString::to_string).collect();
                    println!("Feedback sent to {}.", names.join(" and "));
                    persist(&config, &store)?;
                    Ok(())
                }
                Err(err) => Err(err),
            }
        }
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            ui::print_error(&err);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Reads the fixture file behind a loading spinner.
fn open_store(config: &OrderflowConfig) -> Result<InMemoryOrderStore> {
    let spinner = ui::LoadingSpinner::start();
    let loaded = InMemoryOrderStore::load(&config.fixtures_path);
    spinner.finish();
    loaded.with_context(|| format!("loading orders from {}", config.fixtures_path.display()))
}

fn persist(config: &OrderflowConfig, store: &InMemoryOrderStore) -> Result<()> {
    if !config.save_changes {
        return Ok(());
    }
    store
        .save(&config.fixtures_path)
        .with_context(|| format!("saving {}", config.fixtures_path.display()))
}

/// Walks a handed-over order to delivery, then shows a refused action.
fn run_demo(workflow: OrderWorkflow) {
    let mut store = InMemoryOrderStore::new(vec![Order::new("DEMO-1", OrderState::HandedOver)]);
    let steps = [
        (Event::Appraise, Some(AppraisalResult::Passed)),
        (Event::Ship, None),
        (Event::Deliver, None),
        (Event::Accept, None),
    ];

    for (event, appraisal) in steps {
        match workflow.request_transition(&mut store, "DEMO-1", event, appraisal) {
            Ok(outcome) => ui::print_transition(&outcome),
            Err(err) => ui::print_error(&err),
        }
    }

    let feedback: Result<_, OrderflowError> =
        FeedbackDispatch::send_feedback(&mut store, "DEMO-1", "   ", Recipients::default());
    if let Err(err) = feedback {
        ui::print_error(&err);
    }

    if let Ok(view) = OrderWorkflow::view(&store, "DEMO-1") {
        println!();
        ui::print_order_view(&view);
        println!();
        ui::print_notifications(&view.order.notifications);
    }
}
