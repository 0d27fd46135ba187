//! Pure match scoring for bank reconciliation.
//!
//! A candidate pairing (bank movement, internal payment) is scored on a
//! weighted combination of amount proximity, date proximity and textual
//! similarity between the statement description and the counterparty name,
//! plus a flat boost when the normalized description is already a learned
//! pattern pointing at that counterparty. The weights are hand-tuned
//! defaults; deployments are expected to calibrate them against their own
//! confirmed-match history via [`MatcherConfig`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::text::{levenshtein, similarity_threshold};

/// Tuning knobs for the reconciliation matcher.
///
/// All thresholds operate on the final score in `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct MatcherConfig {
    /// Maximum relative amount difference, in basis points, still scored as
    /// an exact amount match. 50 bps = 0.5%.
    pub amount_tolerance_bps: i64,
    /// Candidates further apart than this many days score zero on the date
    /// component and are not paired at all.
    pub date_window_days: i64,
    pub amount_weight: f64,
    pub date_weight: f64,
    pub text_weight: f64,
    /// Added when the learned pattern map already maps the description to
    /// the candidate's counterparty.
    pub pattern_boost: f64,
    pub high_threshold: f64,
    pub medium_threshold: f64,
    pub low_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            amount_tolerance_bps: 50,
            date_window_days: 60,
            amount_weight: 0.5,
            date_weight: 0.2,
            text_weight: 0.3,
            pattern_boost: 0.25,
            high_threshold: 0.85,
            medium_threshold: 0.60,
            low_threshold: 0.35,
        }
    }
}

/// Discrete confidence tier derived from the score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Scores one candidate pairing. Inputs are already normalized: amounts in
/// minor units, text through `normalize_text_key`.
#[must_use]
pub fn score_candidate(
    cfg: &MatcherConfig,
    movement_amount_minor: i64,
    movement_date: NaiveDate,
    movement_desc_norm: &str,
    payment_amount_minor: i64,
    payment_date: NaiveDate,
    counterparty_norm: &str,
    learned: bool,
) -> f64 {
    let score = cfg.amount_weight * amount_score(cfg, movement_amount_minor, payment_amount_minor)
        + cfg.date_weight * date_score(cfg, movement_date, payment_date)
        + cfg.text_weight * text_score(movement_desc_norm, counterparty_norm);
    let score = if learned { score + cfg.pattern_boost } else { score };
    score.clamp(0.0, 1.0)
}

/// Maps a score onto a confidence tier; `None` means the candidate is not
/// plausible enough to surface.
#[must_use]
pub fn confidence_for(cfg: &MatcherConfig, score: f64) -> Option<Confidence> {
    if score >= cfg.high_threshold {
        Some(Confidence::High)
    } else if score >= cfg.medium_threshold {
        Some(Confidence::Medium)
    } else if score >= cfg.low_threshold {
        Some(Confidence::Low)
    } else {
        None
    }
}

fn amount_score(cfg: &MatcherConfig, movement_minor: i64, payment_minor: i64) -> f64 {
    let movement = movement_minor.abs();
    let payment = payment_minor.abs();
    let reference = movement.max(payment).max(1);
    let diff_bps = (movement - payment).abs().saturating_mul(10_000) / reference;

    if diff_bps <= cfg.amount_tolerance_bps {
        1.0
    } else if diff_bps <= cfg.amount_tolerance_bps * 10 {
        0.5
    } else {
        0.0
    }
}

fn date_score(cfg: &MatcherConfig, movement_date: NaiveDate, payment_date: NaiveDate) -> f64 {
    let gap = (movement_date - payment_date).num_days().abs();
    if gap >= cfg.date_window_days {
        return 0.0;
    }
    1.0 - gap as f64 / cfg.date_window_days as f64
}

/// Fraction of counterparty tokens found in the description, each token
/// matched exactly or within a small edit distance.
fn text_score(desc_norm: &str, counterparty_norm: &str) -> f64 {
    let wanted: Vec<&str> = counterparty_norm.split_whitespace().collect();
    if wanted.is_empty() {
        return 0.0;
    }
    let available: Vec<&str> = desc_norm.split_whitespace().collect();

    let mut matched = 0usize;
    for token in &wanted {
        let threshold = similarity_threshold(token);
        let hit = available
            .iter()
            .any(|candidate| levenshtein(token, candidate) <= threshold);
        if hit {
            matched += 1;
        }
    }

    matched as f64 / wanted.len() as f64
}
