//! Terminal output: status badges, the progress stepper and the loading spinner.
//!
//! Uses `console` for colours and `indicatif` for the spinner shown while
//! order data loads.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::OrderflowError;
use crate::state_machine::{AppraisalResult, Event, Notification, Order, OrderState};
use crate::workflow::{OrderView, TransitionOutcome};

/// Colour of a status badge.
pub fn badge_style(state: OrderState) -> Style {
    match state {
        OrderState::Pending => Style::new().yellow(),
        OrderState::Accepted => Style::new().blue(),
        OrderState::HandedOver => Style::new().color256(208),
        OrderState::Appraised => Style::new().cyan(),
        OrderState::Shipped => Style::new().cyan().bright(),
        OrderState::Delivered => Style::new().green(),
        OrderState::Cancelled | OrderState::Rejected => Style::new().red(),
    }
    .bold()
}

/// Button label shown for an offered action.
pub fn action_label(event: Event) -> &'static str {
    match event {
        Event::Accept => "Accept Order",
        Event::Reject => "Reject Order",
        Event::HandOver => "Mark as Handed Over",
        Event::Appraise => "Appraise Order",
        Event::Ship => "Mark as Shipped",
        Event::Deliver => "Mark as Delivered",
    }
}

/// One line per step; completed steps get a check mark.
pub fn render_stepper(step_index: usize) -> Vec<String> {
    OrderState::steps()
        .iter()
        .enumerate()
        .map(|(i, step)| {
            if i < step_index {
                format!("  ✓ {step}")
            } else if i == step_index {
                format!("  ● {step}")
            } else {
                format!("  ○ {step}")
            }
        })
        .collect()
}

/// Spinner shown while orders are read.
pub struct LoadingSpinner {
    pb: ProgressBar,
}

impl LoadingSpinner {
    pub fn start() -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Loading order details...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

pub fn print_order_list(orders: &[Order]) {
    for order in orders {
        let customer = order.customer_name.as_deref().unwrap_or("-");
        println!(
            "#{:<10} {:<24} {:<20} {:>10.2}",
            order.order_id.as_str(),
            badge_style(order.order_status).apply_to(order.order_status.to_string()),
            customer,
            order.grand_total
        );
    }
}

pub fn print_order_view(view: &OrderView) {
    let order = &view.order;
    println!(
        "Order #{}  {}",
        order.order_id,
        badge_style(view.state).apply_to(view.state.to_string())
    );
    if let Some(date) = &order.order_date {
        println!("Placed on: {date}");
    }
    if let Some(name) = &order.customer_name {
        println!("Customer: {name}");
    }
    if let Some(seller) = &order.seller_name {
        println!("Seller: {seller}");
    }
    let appraisal = match view.appraised_status {
        Some(AppraisalResult::Passed) => Style::new().green().apply_to("Passed"),
        Some(AppraisalResult::Failed) => Style::new().red().apply_to("Failed"),
        None => Style::new().dim().apply_to("Pending"),
    };
    println!("Appraised status: {appraisal}");
    println!();
    for line in render_stepper(view.step_index) {
        println!("{line}");
    }
    println!();
    if !order.items.is_empty() {
        for item in &order.items {
            println!(
                "  {:<30} x{:<3} {:>10.2}",
                item.name, item.quantity, item.total_price
            );
        }
        println!("  {:<35} {:>10.2}", "Grand total", order.grand_total);
        println!();
    }
    if view.offered_actions.is_empty() {
        println!(
            "Order is in the \"{}\" stage. No further action is required.",
            view.state
        );
    } else {
        let actions: Vec<String> = view
            .offered_actions
            .iter()
            .map(|e| format!("{} ({e})", action_label(*e)))
            .collect();
        println!("Actions: {}", actions.join(", "));
    }
}

pub fn print_notifications(notifications: &[Notification]) {
    if notifications.is_empty() {
        println!("No notifications.");
        return;
    }
    for n in notifications {
        let when = n
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!("{:<16} {}", when, n.message);
    }
}

pub fn print_transition(outcome: &TransitionOutcome) {
    let style = if outcome.state == OrderState::Rejected {
        Style::new().red().bold()
    } else {
        Style::new().green().bold()
    };
    println!(
        "{} {} → {}: {}",
        style.apply_to(if outcome.state == OrderState::Rejected { "✗" } else { "✓" }),
        outcome.previous,
        badge_style(outcome.state).apply_to(outcome.state.to_string()),
        outcome.message
    );
    if outcome.navigate_away {
        println!("  Returning to the order list.");
    }
}

/// Non-fatal error notice for a refused action.
pub fn print_error(err: &OrderflowError) {
    eprintln!("  {} {err}", Style::new().red().bold().apply_to("✗"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepper_marks_completed_steps() {
        let lines = render_stepper(2);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "  ✓ Pending");
        assert_eq!(lines[1], "  ✓ Accepted");
        assert_eq!(lines[2], "  ● Handed Over");
        assert_eq!(lines[5], "  ○ Delivered");
    }

    #[test]
    fn action_labels() {
        assert_eq!(action_label(Event::HandOver), "Mark as Handed Over");
        assert_eq!(action_label(Event::Appraise), "Appraise Order");
    }
}
