use ocd_core::entities::Decision;
use ocd_core::enums::Feedback;
use ocd_core::payload::{Exchange, RetrieverAction, RetrieverState};

use super::scaled;
use crate::components::{
    RetrieverAccuracy, RetrieverComponents, RetrieverImmediate, RetrieverQuality,
};

/// Retriever acceptance treats any rejected answer as fully wrong.
#[must_use]
pub const fn acceptance(feedback: Option<Feedback>) -> f64 {
    match feedback {
        Some(Feedback::Confirmed) => 1.0,
        Some(Feedback::Corrected | Feedback::Overridden) => -1.0,
        Some(Feedback::Ignored) | None => 0.0,
    }
}

/// Relative length change between the generated answer and the correction.
/// Zero when either side is empty.
#[must_use]
pub fn edit_distance(generated: &str, corrected: &str) -> f64 {
    if generated.is_empty() || corrected.is_empty() {
        return 0.0;
    }
    let generated = char_len(generated);
    let corrected = char_len(corrected);
    -0.1 * (generated - corrected).abs() / generated
}

fn char_len(s: &str) -> f64 {
    f64::from(u32::try_from(s.chars().count()).unwrap_or(u32::MAX))
}

#[must_use]
pub fn calculate(
    decision: &Decision,
    ex: &Exchange<RetrieverState, RetrieverAction>,
) -> RetrieverComponents {
    let outcome = decision.outcome();

    let hallucination_penalty = match outcome.hallucination_count {
        Some(n) if n > 0 => -f64::from(n),
        _ => 0.0,
    };

    RetrieverComponents {
        immediate: RetrieverImmediate {
            user_acceptance: acceptance(decision.user_feedback),
            edit_distance: ex.correction.as_ref().map_or(0.0, |c| {
                edit_distance(&ex.action.generated_content, &c.generated_content)
            }),
        },
        accuracy: RetrieverAccuracy {
            citation_correctness: scaled(0.5, outcome.citation_correctness),
            hallucination_penalty,
            completeness: scaled(0.3, outcome.completeness),
        },
        quality: RetrieverQuality {
            coherence: scaled(0.4, outcome.coherence),
            style_alignment: scaled(0.2, outcome.style_alignment),
        },
    }
}
