use ocd_core::entities::Decision;
use ocd_core::payload::{Exchange, StorerAction, StorerState};

use super::{feedback_reward, flagged, scaled};
use crate::components::{StorerComponents, StorerDelayed, StorerImmediate};

const STORER_FIELDS: u8 = 4;

/// Number of action fields the correction changed. A correction that leaves
/// the optional summary empty does not count as changing it.
#[must_use]
pub fn changed_fields(action: &StorerAction, correction: &StorerAction) -> u8 {
    let mut changed = 0;
    if correction.collection != action.collection {
        changed += 1;
    }
    if correction.title != action.title {
        changed += 1;
    }
    if correction.tags != action.tags {
        changed += 1;
    }
    if correction.summary.is_some() && correction.summary != action.summary {
        changed += 1;
    }
    changed
}

#[must_use]
pub fn calculate(decision: &Decision, ex: &Exchange<StorerState, StorerAction>) -> StorerComponents {
    let outcome = decision.outcome();

    let edit_distance = ex.correction.as_ref().map_or(0.0, |correction| {
        let changed = changed_fields(&ex.action, correction);
        if changed == 0 {
            0.0
        } else {
            -0.1 * f64::from(changed) / f64::from(STORER_FIELDS)
        }
    });

    StorerComponents {
        immediate: StorerImmediate {
            user_acceptance: feedback_reward(decision.user_feedback),
            edit_distance,
        },
        delayed: StorerDelayed {
            corpus_coherence: scaled(0.5, outcome.corpus_coherence),
            findability: scaled(0.3, outcome.findability),
            duplication_penalty: flagged(-0.5, outcome.duplication_detected),
        },
    }
}
