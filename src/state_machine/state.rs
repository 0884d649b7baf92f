use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::order::AppraisalResult;
use crate::error::TransitionError;

/// Lifecycle status of an order.
///
/// Orders normally flow: PENDING → ACCEPTED → HANDED OVER → APPRAISED → SHIPPED → DELIVERED,
/// with REJECTED and CANCELLED as side exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderState {
    #[default]
    Pending,
    Accepted,
    #[serde(rename = "Handed Over")]
    HandedOver,
    Appraised,
    Shipped,
    Delivered,
    Rejected,
    Cancelled,
}

/// Labels of the progress stepper, in order.
const STEPS: [OrderState; 6] = [
    OrderState::Pending,
    OrderState::Accepted,
    OrderState::HandedOver,
    OrderState::Appraised,
    OrderState::Shipped,
    OrderState::Delivered,
];

impl OrderState {
    pub const ALL: [OrderState; 8] = [
        OrderState::Pending,
        OrderState::Accepted,
        OrderState::HandedOver,
        OrderState::Appraised,
        OrderState::Shipped,
        OrderState::Delivered,
        OrderState::Rejected,
        OrderState::Cancelled,
    ];

    /// No event is accepted once an order reaches one of these.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderState::Delivered | OrderState::Cancelled | OrderState::Rejected
        )
    }

    /// Position in the six-step progress stepper. `Rejected` and `Cancelled`
    /// are off the happy path and have no step.
    pub fn step_index(self) -> Option<usize> {
        STEPS.iter().position(|s| *s == self)
    }

    /// The stepper steps, for renderers.
    pub fn steps() -> &'static [OrderState] {
        &STEPS
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderState::Pending => write!(f, "Pending"),
            OrderState::Accepted => write!(f, "Accepted"),
            OrderState::HandedOver => write!(f, "Handed Over"),
            OrderState::Appraised => write!(f, "Appraised"),
            OrderState::Shipped => write!(f, "Shipped"),
            OrderState::Delivered => write!(f, "Delivered"),
            OrderState::Rejected => write!(f, "Rejected"),
            OrderState::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        OrderState::ALL
            .into_iter()
            .find(|state| state.to_string().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

/// An operator action requested against an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Accept,
    Reject,
    HandOver,
    Appraise,
    Ship,
    Deliver,
}

impl Event {
    pub const ALL: [Event; 6] = [
        Event::Accept,
        Event::Reject,
        Event::HandOver,
        Event::Appraise,
        Event::Ship,
        Event::Deliver,
    ];

    /// Verb phrase used in operator messages ("Cannot {verb} from ...").
    pub fn verb(self) -> &'static str {
        match self {
            Event::Accept => "accept order",
            Event::Reject => "reject order",
            Event::HandOver => "mark as handed over",
            Event::Appraise => "appraise order",
            Event::Ship => "mark as shipped",
            Event::Deliver => "mark as delivered",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Accept => write!(f, "accept"),
            Event::Reject => write!(f, "reject"),
            Event::HandOver => write!(f, "hand_over"),
            Event::Appraise => write!(f, "appraise"),
            Event::Ship => write!(f, "ship"),
            Event::Deliver => write!(f, "deliver"),
        }
    }
}

/// Which guard decides whether an event applies to the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardPolicy {
    /// Every event requires the order to be Appraised, Shipped or Delivered.
    /// Appraise is also accepted from Handed Over.
    #[default]
    Observed,
    /// Each event requires its natural predecessor state.
    Sequential,
}

/// The result of evaluating an event against a state. Nothing is applied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub next: OrderState,
    /// Appraisal outcome to record alongside the new status.
    pub appraisal: Option<AppraisalResult>,
    /// The presentation layer should leave the order detail view.
    pub navigate_away: bool,
}

/// Pure transition rules for the order lifecycle.
pub struct StateMachine;

impl StateMachine {
    /// Evaluate `event` against `current`.
    ///
    /// - Terminal states reject every event.
    /// - The guard policy must admit the event from `current`.
    /// - `Appraise` needs a result: passed lands in `Appraised`, failed lands
    ///   in `Rejected`.
    /// - Any landing in `Rejected` asks the caller to navigate away.
    pub fn evaluate(
        policy: GuardPolicy,
        current: OrderState,
        event: Event,
        appraisal: Option<AppraisalResult>,
    ) -> Result<Evaluation, TransitionError> {
        if current.is_terminal() {
            return Err(TransitionError::Terminal { state: current });
        }
        if !Self::permits(policy, current, event) {
            return Err(TransitionError::NotPermitted {
                event,
                state: current,
            });
        }

        let (next, recorded) = match event {
            Event::Accept => (OrderState::Accepted, None),
            Event::Reject => (OrderState::Rejected, None),
            Event::HandOver => (OrderState::HandedOver, None),
            Event::Appraise => match appraisal {
                Some(AppraisalResult::Passed) => {
                    (OrderState::Appraised, Some(AppraisalResult::Passed))
                }
                Some(AppraisalResult::Failed) => {
                    (OrderState::Rejected, Some(AppraisalResult::Failed))
                }
                None => return Err(TransitionError::MissingAppraisalResult),
            },
            Event::Ship => (OrderState::Shipped, None),
            Event::Deliver => (OrderState::Delivered, None),
        };

        Ok(Evaluation {
            next,
            appraisal: recorded,
            navigate_away: next == OrderState::Rejected,
        })
    }

    /// Whether the guard admits `event` from `state`. Terminal states are
    /// checked separately by [`StateMachine::evaluate`].
    pub fn permits(policy: GuardPolicy, state: OrderState, event: Event) -> bool {
        match policy {
            GuardPolicy::Observed => {
                matches!(
                    state,
                    OrderState::Appraised | OrderState::Shipped | OrderState::Delivered
                ) || (event == Event::Appraise && state == OrderState::HandedOver)
            }
            GuardPolicy::Sequential => matches!(
                (event, state),
                (Event::Accept, OrderState::Pending)
                    | (Event::Reject, OrderState::Pending)
                    | (Event::HandOver, OrderState::Accepted)
                    | (Event::Appraise, OrderState::HandedOver)
                    | (Event::Ship, OrderState::Appraised)
                    | (Event::Deliver, OrderState::Shipped)
            ),
        }
    }

    /// The actions an operator is offered for an order in `state`.
    pub fn offered_actions(state: OrderState) -> Vec<Event> {
        match state {
            OrderState::Pending => vec![Event::Accept, Event::Reject],
            OrderState::Accepted => vec![Event::HandOver],
            OrderState::HandedOver => vec![Event::Appraise],
            OrderState::Appraised => vec![Event::Ship],
            OrderState::Shipped => vec![Event::Deliver],
            OrderState::Delivered | OrderState::Rejected | OrderState::Cancelled => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(current: OrderState, event: Event) -> Result<Evaluation, TransitionError> {
        StateMachine::evaluate(GuardPolicy::Observed, current, event, None)
    }

    #[test]
    fn terminal_states_reject_every_event() {
        for state in [OrderState::Delivered, OrderState::Cancelled, OrderState::Rejected] {
            for event in Event::ALL {
                for policy in [GuardPolicy::Observed, GuardPolicy::Sequential] {
                    let err = StateMachine::evaluate(
                        policy,
                        state,
                        event,
                        Some(AppraisalResult::Passed),
                    )
                    .unwrap_err();
                    assert_eq!(err, TransitionError::Terminal { state });
                }
            }
        }
    }

    #[test]
    fn appraise_failed_rejects_and_navigates_away() {
        let e = StateMachine::evaluate(
            GuardPolicy::Observed,
            OrderState::Appraised,
            Event::Appraise,
            Some(AppraisalResult::Failed),
        )
        .unwrap();
        assert_eq!(e.next, OrderState::Rejected);
        assert_eq!(e.appraisal, Some(AppraisalResult::Failed));
        assert!(e.navigate_away);
    }

    #[test]
    fn appraise_passed_lands_in_appraised() {
        let e = StateMachine::evaluate(
            GuardPolicy::Observed,
            OrderState::HandedOver,
            Event::Appraise,
            Some(AppraisalResult::Passed),
        )
        .unwrap();
        assert_eq!(e.next, OrderState::Appraised);
        assert_eq!(e.appraisal, Some(AppraisalResult::Passed));
        assert!(!e.navigate_away);
    }

    #[test]
    fn appraise_without_result_fails() {
        let err = eval(OrderState::Appraised, Event::Appraise).unwrap_err();
        assert_eq!(err, TransitionError::MissingAppraisalResult);
    }

    #[test]
    fn guard_check_runs_before_result_check() {
        let err = eval(OrderState::Pending, Event::Appraise).unwrap_err();
        assert!(matches!(err, TransitionError::NotPermitted { .. }));
    }

    #[test]
    fn observed_guard_rejects_accept_from_pending() {
        let err = eval(OrderState::Pending, Event::Accept).unwrap_err();
        assert_eq!(
            err,
            TransitionError::NotPermitted {
                event: Event::Accept,
                state: OrderState::Pending,
            }
        );
    }

    #[test]
    fn observed_guard_is_uniform_across_events() {
        for event in [Event::Accept, Event::Reject, Event::HandOver, Event::Ship, Event::Deliver] {
            assert!(StateMachine::permits(GuardPolicy::Observed, OrderState::Appraised, event));
            assert!(StateMachine::permits(GuardPolicy::Observed, OrderState::Shipped, event));
            assert!(!StateMachine::permits(GuardPolicy::Observed, OrderState::Pending, event));
            assert!(!StateMachine::permits(GuardPolicy::Observed, OrderState::Accepted, event));
            assert!(!StateMachine::permits(GuardPolicy::Observed, OrderState::HandedOver, event));
        }
    }

    #[test]
    fn repeating_ship_is_stable() {
        let first = eval(OrderState::Appraised, Event::Ship).unwrap();
        let second = eval(first.next, Event::Ship).unwrap();
        assert_eq!(first.next, OrderState::Shipped);
        assert_eq!(second.next, OrderState::Shipped);
    }

    #[test]
    fn reject_navigates_away() {
        let e = eval(OrderState::Shipped, Event::Reject).unwrap();
        assert_eq!(e.next, OrderState::Rejected);
        assert!(e.navigate_away);
        assert_eq!(e.appraisal, None);
    }

    #[test]
    fn sequential_guard_walks_happy_path() {
        let p = GuardPolicy::Sequential;
        let mut state = OrderState::Pending;
        for event in [Event::Accept, Event::HandOver, Event::Appraise, Event::Ship, Event::Deliver] {
            state = StateMachine::evaluate(p, state, event, Some(AppraisalResult::Passed))
                .unwrap()
                .next;
        }
        assert_eq!(state, OrderState::Delivered);
        assert!(StateMachine::evaluate(p, OrderState::Pending, Event::Ship, None).is_err());
    }

    #[test]
    fn offered_actions_follow_the_stepper() {
        assert_eq!(
            StateMachine::offered_actions(OrderState::Pending),
            vec![Event::Accept, Event::Reject]
        );
        assert_eq!(
            StateMachine::offered_actions(OrderState::HandedOver),
            vec![Event::Appraise]
        );
        assert!(StateMachine::offered_actions(OrderState::Rejected).is_empty());
    }

    #[test]
    fn observed_guard_can_move_an_order_backward() {
        let p = GuardPolicy::Observed;
        let e = StateMachine::evaluate(p, OrderState::Shipped, Event::Accept, None).unwrap();
        assert_eq!(e.next, OrderState::Accepted);

        let e = StateMachine::evaluate(p, OrderState::Appraised, Event::HandOver, None).unwrap();
        assert_eq!(e.next, OrderState::HandedOver);

        let e = StateMachine::evaluate(
            p,
            OrderState::Shipped,
            Event::Appraise,
            Some(AppraisalResult::Passed),
        )
        .unwrap();
        assert_eq!(e.next, OrderState::Appraised);

        // Nothing is admitted from Accepted, so the order stalls there.
        for event in Event::ALL {
            assert!(!StateMachine::permits(p, OrderState::Accepted, event));
        }
    }

    #[test]
    fn sequential_guard_never_moves_to_an_earlier_step() {
        let p = GuardPolicy::Sequential;
        for current in OrderState::ALL {
            for event in Event::ALL {
                for appraisal in [Some(AppraisalResult::Passed), Some(AppraisalResult::Failed)] {
                    let Ok(e) = StateMachine::evaluate(p, current, event, appraisal) else {
                        continue;
                    };
                    match (current.step_index(), e.next.step_index()) {
                        (Some(from), Some(to)) => assert!(to > from, "{current} -> {}", e.next),
                        (_, None) => assert!(e.next.is_terminal()),
                        (None, Some(_)) => panic!("left an off-path state: {current}"),
                    }
                }
            }
        }
    }

    #[test]
    fn step_index_and_terminality() {
        assert_eq!(OrderState::Pending.step_index(), Some(0));
        assert_eq!(OrderState::Delivered.step_index(), Some(5));
        assert_eq!(OrderState::Rejected.step_index(), None);
        assert!(OrderState::Cancelled.is_terminal());
        assert!(!OrderState::Shipped.is_terminal());
    }

    #[test]
    fn state_display_and_parse() {
        assert_eq!(OrderState::HandedOver.to_string(), "Handed Over");
        assert_eq!("Handed Over".parse::<OrderState>().unwrap(), OrderState::HandedOver);
        assert_eq!("handed_over".parse::<OrderState>().unwrap(), OrderState::HandedOver);
        assert_eq!("SHIPPED".parse::<OrderState>().unwrap(), OrderState::Shipped);
        assert!("lost".parse::<OrderState>().is_err());
    }

    #[test]
    fn state_serializes_with_labels() {
        let json = serde_json::to_string(&OrderState::HandedOver).unwrap();
        assert_eq!(json, "\"Handed Over\"");
        let back: OrderState = serde_json::from_str("\"Appraised\"").unwrap();
        assert_eq!(back, OrderState::Appraised);
    }
}
