use ocd_core::entities::Decision;

use super::{feedback_reward, flagged, scaled};
use crate::components::{
    PrioritizerComponents, PrioritizerContextual, PrioritizerDelayed, PrioritizerImmediate,
};

#[must_use]
pub fn calculate(decision: &Decision) -> PrioritizerComponents {
    let outcome = decision.outcome();
    PrioritizerComponents {
        immediate: PrioritizerImmediate {
            user_acceptance: feedback_reward(decision.user_feedback),
        },
        delayed: PrioritizerDelayed {
            completion_success: flagged(1.0, outcome.completed_successfully),
            time_efficiency: scaled(0.5, outcome.time_efficiency),
            strategic_progress: scaled(0.3, outcome.strategic_progress),
            opportunity_cost: scaled(-0.2, outcome.opportunity_cost),
        },
        contextual: PrioritizerContextual {
            energy_alignment: scaled(0.2, outcome.energy_alignment),
            flow_maintenance: scaled(0.2, outcome.flow_maintenance),
        },
    }
}
