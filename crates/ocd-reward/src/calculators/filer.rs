use ocd_core::entities::Decision;
use ocd_core::enums::{Feedback, Priority, Swimlane};
use ocd_core::outcome::OutcomeMetrics;
use ocd_core::payload::{Exchange, FilerAction, FilerState};

use super::{feedback_reward, scaled};
use crate::components::{FilerComponents, FilerDelayed, FilerImmediate, FilerStrategic};
use crate::context::RewardContext;

/// Minutes used when the item has no swimlane.
const FALLBACK_BASE_MINUTES: f64 = 480.0;

/// Expected minutes in DOING for a swimlane/priority pair.
#[must_use]
pub fn expected_minutes(swimlane: Option<Swimlane>, priority: Option<Priority>) -> f64 {
    let base = swimlane.map_or(FALLBACK_BASE_MINUTES, Swimlane::base_minutes);
    let multiplier = priority.map_or(1.0, Priority::time_multiplier);
    base * multiplier
}

#[must_use]
pub fn calculate(
    decision: &Decision,
    ex: &Exchange<FilerState, FilerAction>,
    ctx: &RewardContext,
) -> FilerComponents {
    let mut immediate = FilerImmediate {
        user_feedback: feedback_reward(decision.user_feedback),
        confidence_calibration: 0.0,
    };
    if let (Some(confidence), Some(feedback)) = (decision.confidence, decision.user_feedback) {
        let correct = if feedback == Feedback::Confirmed { 1.0 } else { 0.0 };
        immediate.confidence_calibration = -(confidence - correct).abs();
    }

    let delayed = delayed_signals(decision, &ex.action, ctx);

    let mut strategic = FilerStrategic {
        goal_alignment: 0.0,
        opportunity_cost: scaled(-0.2, decision.outcome().opportunity_cost),
    };
    if let Some(focus) = &ctx.focus {
        if ex.action.labels.iter().any(|l| *l == focus.priority_label) {
            strategic.goal_alignment = 0.5;
        }
    }

    FilerComponents {
        immediate,
        delayed,
        strategic,
    }
}

/// Delayed signals come from the outcome recorded on the decision, so a
/// terminal result survives later moves of the item (e.g. into the archive).
/// A terminal item whose outcome the tracker has not recorded yet stands in
/// for it.
fn delayed_signals(
    decision: &Decision,
    action: &FilerAction,
    ctx: &RewardContext,
) -> FilerDelayed {
    let recorded = decision.outcome();
    let metrics = match &ctx.item {
        Some(item) if recorded.completed_successfully.is_none() && item.status.is_terminal() => {
            item.outcome_metrics().merged(&recorded)
        }
        _ => recorded,
    };
    let (swimlane, priority) = ctx
        .item
        .as_ref()
        .map_or((action.swimlane, action.priority), |item| {
            (item.swimlane, item.priority)
        });
    outcome_signals(&metrics, swimlane, priority)
}

fn outcome_signals(
    metrics: &OutcomeMetrics,
    swimlane: Option<Swimlane>,
    priority: Option<Priority>,
) -> FilerDelayed {
    let mut delayed = FilerDelayed::default();
    let cycles = metrics.cycle_count.unwrap_or(0);

    match metrics.completed_successfully {
        Some(true) => delayed.completion_success = if cycles == 0 { 1.0 } else { 0.5 },
        Some(false) => delayed.completion_success = -0.3,
        None => {}
    }

    if metrics.blocked_at.is_some() {
        delayed.blockage_avoidance = -1.0;
    }

    if cycles > 0 {
        delayed.rework_penalty = -0.2 * f64::from(cycles);
    }

    if metrics.completed_successfully == Some(true) {
        if let Some(minutes) = metrics.total_time_in_create.filter(|m| *m > 0.0) {
            let ratio = minutes / expected_minutes(swimlane, priority);
            if ratio < 1.2 {
                delayed.time_efficiency = 0.5;
            } else if ratio > 2.0 {
                delayed.time_efficiency = -0.5;
            }
        }
    }

    delayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::fixtures::{decision, with_feedback, with_outcome};
    use crate::context::StrategicFocus;
    use chrono::{TimeZone, Utc};
    use ocd_core::entities::Item;
    use ocd_core::enums::ItemStatus;
    use ocd_core::payload::AgentPayload;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn filer_exchange(labels: &[&str]) -> Exchange<FilerState, FilerAction> {
        Exchange::new(
            FilerState {
                instructions: "Draft the grant proposal".into(),
                ..FilerState::default()
            },
            FilerAction {
                swimlane: Some(Swimlane::Project),
                priority: Some(Priority::High),
                labels: labels.iter().map(ToString::to_string).collect(),
                urgency: None,
            },
        )
    }

    fn item(status: ItemStatus, cycle_count: u32, minutes: u32) -> Item {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Item {
            id: "itm-1".into(),
            user_id: "usr-1".into(),
            title: "Grant proposal".into(),
            status,
            swimlane: Some(Swimlane::Project),
            priority: Some(Priority::Medium),
            labels: vec![],
            cycle_count,
            total_time_in_create: minutes,
            started_at: Some(t0),
            completed_at: (status == ItemStatus::Done).then_some(t0),
            blocked_at: None,
            status_changed_at: Some(t0),
            created_at: t0,
            updated_at: t0,
        }
    }

    fn finished(cycle_count: u32, minutes: f64) -> OutcomeMetrics {
        OutcomeMetrics {
            completed_successfully: Some(true),
            cycle_count: Some(cycle_count),
            total_time_in_create: Some(minutes),
            ..OutcomeMetrics::default()
        }
    }

    fn with_item(item: Item) -> RewardContext {
        RewardContext {
            item: Some(item),
            focus: None,
        }
    }

    fn run(d: &Decision, ctx: &RewardContext) -> FilerComponents {
        let AgentPayload::Filer(ex) = &d.payload else {
            panic!("filer payload expected");
        };
        calculate(d, ex, ctx)
    }

    #[rstest]
    #[case(Some(Swimlane::Expedite), Some(Priority::High), 96.0)]
    #[case(Some(Swimlane::Project), Some(Priority::Medium), 480.0)]
    #[case(Some(Swimlane::Habit), Some(Priority::Low), 72.0)]
    #[case(Some(Swimlane::Home), None, 180.0)]
    #[case(None, Some(Priority::Low), 576.0)]
    fn expected_time_table(
        #[case] swimlane: Option<Swimlane>,
        #[case] priority: Option<Priority>,
        #[case] expected: f64,
    ) {
        assert!((expected_minutes(swimlane, priority) - expected).abs() < 1e-9);
    }

    #[test]
    fn confidence_calibration_needs_both_inputs() {
        let mut d = decision(AgentPayload::Filer(filer_exchange(&[])));
        d.confidence = Some(0.9);
        assert_eq!(run(&d, &RewardContext::default()).immediate.confidence_calibration, 0.0);

        let d = with_feedback(d, Some(Feedback::Corrected));
        let c = run(&d, &RewardContext::default());
        assert!((c.immediate.confidence_calibration + 0.9).abs() < 1e-12);

        let d = with_feedback(d, Some(Feedback::Confirmed));
        let c = run(&d, &RewardContext::default());
        assert!((c.immediate.confidence_calibration + 0.1).abs() < 1e-12);
    }

    #[rstest]
    #[case(0, 1.0)]
    #[case(1, 0.5)]
    #[case(3, 0.5)]
    fn completion_success_on_done(#[case] cycles: u32, #[case] expected: f64) {
        let d = with_outcome(
            decision(AgentPayload::Filer(filer_exchange(&[]))),
            finished(cycles, 0.0),
        );
        assert_eq!(run(&d, &RewardContext::default()).delayed.completion_success, expected);
    }

    #[test]
    fn cold_storage_and_blockage() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let d = with_outcome(
            decision(AgentPayload::Filer(filer_exchange(&[]))),
            OutcomeMetrics {
                completed_successfully: Some(false),
                blocked_at: Some(t0),
                total_time_in_create: Some(30.0),
                ..OutcomeMetrics::default()
            },
        );
        let c = run(&d, &RewardContext::default());
        assert_eq!(c.delayed.completion_success, -0.3);
        assert_eq!(c.delayed.blockage_avoidance, -1.0);
        assert_eq!(c.delayed.time_efficiency, 0.0);
    }

    // Project/Medium expects 480 minutes.
    #[rstest]
    #[case(300.0, 0.5)]
    #[case(576.0, 0.0)]
    #[case(960.0, 0.0)]
    #[case(961.0, -0.5)]
    fn time_efficiency_bands(#[case] minutes: f64, #[case] expected: f64) {
        let d = with_outcome(
            decision(AgentPayload::Filer(filer_exchange(&[]))),
            finished(0, minutes),
        );
        let ctx = with_item(item(ItemStatus::Done, 0, 0));
        assert_eq!(run(&d, &ctx).delayed.time_efficiency, expected);
    }

    #[test]
    fn time_efficiency_without_item_uses_filed_lane() {
        // Project/High from the action expects 384 minutes.
        let d = with_outcome(
            decision(AgentPayload::Filer(filer_exchange(&[]))),
            finished(0, 470.0),
        );
        assert_eq!(run(&d, &RewardContext::default()).delayed.time_efficiency, 0.0);
    }

    #[test]
    fn rework_penalty_strictly_decreases() {
        let base = decision(AgentPayload::Filer(filer_exchange(&[])));
        let mut previous = f64::INFINITY;
        for cycles in 0..6 {
            let d = with_outcome(base.clone(), finished(cycles, 0.0));
            let penalty = run(&d, &RewardContext::default()).delayed.rework_penalty;
            assert!(penalty < previous, "cycles={cycles}");
            previous = penalty;
        }
    }

    #[test]
    fn archived_item_keeps_recorded_outcome() {
        let d = with_outcome(
            decision(AgentPayload::Filer(filer_exchange(&[]))),
            finished(0, 300.0),
        );
        let done = run(&d, &with_item(item(ItemStatus::Done, 0, 300)));
        let archived = run(&d, &with_item(item(ItemStatus::Archive, 0, 300)));
        assert_eq!(archived, done);
        assert_eq!(archived.delayed.completion_success, 1.0);
        assert_eq!(archived.delayed.time_efficiency, 0.5);
    }

    #[test]
    fn terminal_item_stands_in_for_missing_outcome() {
        let d = decision(AgentPayload::Filer(filer_exchange(&[])));
        let c = run(&d, &with_item(item(ItemStatus::Done, 2, 300)));
        assert_eq!(c.delayed.completion_success, 0.5);
        assert!((c.delayed.rework_penalty + 0.4).abs() < 1e-12);

        let c = run(&d, &with_item(item(ItemStatus::ColdStorage, 0, 0)));
        assert_eq!(c.delayed.completion_success, -0.3);
    }

    #[test]
    fn open_item_without_outcome_has_no_delayed_signal() {
        let d = decision(AgentPayload::Filer(filer_exchange(&[])));
        let mut doing = item(ItemStatus::Blocked, 2, 120);
        doing.blocked_at = Some(doing.created_at);
        assert_eq!(run(&d, &with_item(doing)).delayed, FilerDelayed::default());
    }

    #[test]
    fn goal_alignment_matches_priority_label() {
        let d = decision(AgentPayload::Filer(filer_exchange(&["Job 2 (Authority)"])));
        let focus = |label: &str| RewardContext {
            item: None,
            focus: Some(StrategicFocus {
                priority_label: label.into(),
            }),
        };
        assert_eq!(run(&d, &focus("Job 2 (Authority)")).strategic.goal_alignment, 0.5);
        assert_eq!(run(&d, &focus("Job 1 (Income)")).strategic.goal_alignment, 0.0);
        assert_eq!(run(&d, &RewardContext::default()).strategic.goal_alignment, 0.0);
    }

    #[test]
    fn opportunity_cost_passes_through() {
        let d = with_outcome(
            decision(AgentPayload::Filer(filer_exchange(&[]))),
            OutcomeMetrics {
                opportunity_cost: Some(1.5),
                ..OutcomeMetrics::default()
            },
        );
        let c = run(&d, &RewardContext::default());
        assert!((c.strategic.opportunity_cost + 0.3).abs() < 1e-12);
    }

    #[test]
    fn no_signal_is_all_zero() {
        let d = decision(AgentPayload::Filer(filer_exchange(&["Job 1 (Income)"])));
        assert_eq!(run(&d, &RewardContext::default()), FilerComponents::default());
    }
}
