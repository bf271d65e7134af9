use moodsignal_common::{Label, Verdict};

pub const TEXT_WEIGHT: f64 = 0.6;
pub const DEMOGRAPHIC_WEIGHT: f64 = 0.4;

/// Fixed-weight blend of a text score and a demographic score. Both scores
/// are required; nothing is imputed.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnsembleScorer;

impl EnsembleScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text_score: f64, demographic_score: f64) -> Verdict {
        let weighted_score = TEXT_WEIGHT * text_score + DEMOGRAPHIC_WEIGHT * demographic_score;
        Verdict {
            label: Label::from_score(weighted_score),
            weighted_score,
            text_score,
            demographic_score,
        }
    }
}
