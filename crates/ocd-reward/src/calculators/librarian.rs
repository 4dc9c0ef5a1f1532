use ocd_core::entities::Decision;

use super::{feedback_reward, flagged};
use crate::components::{LibrarianComponents, LibrarianDelayed, LibrarianImmediate};

#[must_use]
pub fn calculate(decision: &Decision) -> LibrarianComponents {
    let outcome = decision.outcome();
    LibrarianComponents {
        immediate: LibrarianImmediate {
            user_feedback: feedback_reward(decision.user_feedback),
        },
        delayed: LibrarianDelayed {
            conflict_prevention: flagged(1.0, outcome.conflict_prevented),
            false_positive_penalty: flagged(-0.5, outcome.false_positive),
            missed_issue_penalty: flagged(-1.0, outcome.missed_issue),
            dependency_accuracy: flagged(0.5, outcome.dependency_was_real),
        },
    }
}
