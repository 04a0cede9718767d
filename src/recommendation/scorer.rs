//! Keyword-driven ranking of candidate transitions.
//!
//! Every eligible candidate starts at a score of one and collects additive
//! bonuses from its target status name, the task's tags and priority, and the
//! task's most recent move. Confidence is derived from the best score, the
//! spread between best and worst, and the number of candidates, and is
//! compressed so that a handful of keyword matches never claims certainty.

use super::domain::{
    Confidence, HistoryEntry, SuggestionInput, TransitionCandidate, TransitionSuggestion,
};
use crate::task::domain::Priority;
use crate::workflow::domain::StatusId;

/// Suggestions below this confidence are withheld.
pub const MIN_CONFIDENCE: Confidence = Confidence::from_thousandths(600);

/// Upper bound on reported confidence.
pub const CONFIDENCE_CAP: Confidence = Confidence::CAP;

const BASE_SCORE: f64 = 1.0;
const REVIEW_BONUS: f64 = 1.5;
const QA_BONUS: f64 = 1.0;
const QA_TAGGED_BONUS: f64 = 2.0;
const IN_PROGRESS_BONUS: f64 = 0.5;
const REPEAT_BONUS: f64 = 1.0;

const REVIEW_WORDS: &[&str] = &["review", "approval"];
const QA_WORDS: &[&str] = &["qa", "test", "verif"];
const COMPLETION_WORDS: &[&str] = &["done", "complete", "closed", "resolved"];
const IN_PROGRESS_WORDS: &[&str] = &["progress", "doing", "started"];
const QA_TAGS: &[&str] = &["qa", "test"];

struct Scored<'a> {
    candidate: &'a TransitionCandidate,
    score: f64,
    rationale: Vec<String>,
}

/// Ranks `input.candidates` and returns the best one, if it is worth showing.
///
/// Returns `None` when no candidate is eligible or when the resulting
/// confidence is below [`MIN_CONFIDENCE`]. Ties keep the earliest candidate.
///
/// # Examples
///
/// ```
/// use switchyard::recommendation::{
///     domain::{CandidateTarget, SuggestionInput, TransitionCandidate},
///     scorer,
/// };
/// use switchyard::workflow::domain::{StatusId, TransitionId, TransitionKey, UiTrigger};
///
/// let open = StatusId::new();
/// let input = SuggestionInput {
///     current_status_id: open,
///     candidates: vec![TransitionCandidate {
///         transition_id: TransitionId::new(),
///         transition_key: TransitionKey::new("SEND_TO_REVIEW").expect("valid key"),
///         from_status_id: Some(open),
///         to_status: Some(CandidateTarget {
///             status_id: StatusId::new(),
///             name: "In Review".to_owned(),
///         }),
///         disabled: false,
///         ui_trigger: UiTrigger::Normal,
///         role_restricted: false,
///     }],
///     history: Vec::new(),
///     tags: Vec::new(),
///     priority: None,
/// };
///
/// let suggestion = scorer::suggest(&input).expect("review stage is suggested");
/// assert_eq!(suggestion.transition_key.as_str(), "SEND_TO_REVIEW");
/// assert_eq!(suggestion.confidence.thousandths(), 793);
/// ```
#[must_use]
pub fn suggest(input: &SuggestionInput) -> Option<TransitionSuggestion> {
    let qa_tagged = input.tags.iter().any(|tag| is_qa_tag(tag));
    let latest = input.history.first();
    let scored: Vec<Scored<'_>> = input
        .candidates
        .iter()
        .filter(|candidate| is_eligible(candidate, input.current_status_id))
        .map(|candidate| score_candidate(candidate, qa_tagged, input.priority, latest))
        .collect();

    let best = scored.iter().fold(None::<&Scored<'_>>, |leader, entry| match leader {
        Some(current) if current.score >= entry.score => Some(current),
        _ => Some(entry),
    })?;
    let worst = scored
        .iter()
        .map(|entry| entry.score)
        .fold(best.score, f64::min);

    let confidence = confidence(best.score, worst, scored.len());
    if confidence < MIN_CONFIDENCE {
        return None;
    }
    Some(TransitionSuggestion {
        transition_id: best.candidate.transition_id,
        transition_key: best.candidate.transition_key.clone(),
        confidence,
        rationale: best.rationale.clone(),
    })
}

/// Computes the confidence for a ranking.
///
/// `base = 0.45 + min(best / (best + 5), 0.4)`; the relative spread
/// `min(spread / max(best, 1), 1)` falls back to `0.1` when every candidate
/// scored the same; the crowd factor is `min(1, 2 / count)`. The result is
/// `min(0.95, base + 0.1 * relative_spread * crowd_factor)` rounded to three
/// decimals.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "confidence calibration is defined over real-valued scores"
)]
pub fn confidence(best_score: f64, worst_score: f64, candidate_count: usize) -> Confidence {
    let base = 0.45 + (best_score / (best_score + 5.0)).min(0.4);
    let spread = best_score - worst_score;
    let relative_spread = if spread > 0.0 {
        (spread / best_score.max(1.0)).min(1.0)
    } else {
        0.1
    };
    let count = f64::from(u32::try_from(candidate_count.max(1)).unwrap_or(u32::MAX));
    let crowd_factor = (2.0 / count).min(1.0);
    round_to_thousandths(base + 0.1 * relative_spread * crowd_factor)
}

#[expect(
    clippy::float_arithmetic,
    reason = "rounding to three decimals scales the fraction"
)]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is clamped to [0, 950] before the cast"
)]
fn round_to_thousandths(raw: f64) -> Confidence {
    let cap = f64::from(CONFIDENCE_CAP.thousandths());
    let scaled = (raw * 1000.0).round().clamp(0.0, cap);
    Confidence::from_thousandths(scaled as u16)
}

fn is_eligible(candidate: &TransitionCandidate, current_status_id: StatusId) -> bool {
    !candidate.disabled
        && candidate.ui_trigger.is_normal()
        && !candidate.role_restricted
        && candidate.from_status_id.is_some()
        && candidate
            .to_status
            .as_ref()
            .is_some_and(|target| target.status_id != current_status_id)
}

#[expect(
    clippy::float_arithmetic,
    reason = "scores are sums of heuristic weights"
)]
fn score_candidate<'a>(
    candidate: &'a TransitionCandidate,
    qa_tagged: bool,
    priority: Option<Priority>,
    latest: Option<&HistoryEntry>,
) -> Scored<'a> {
    let mut score = BASE_SCORE;
    let mut rationale = Vec::new();
    let target_name = candidate
        .to_status
        .as_ref()
        .map(|target| target.name.as_str())
        .unwrap_or_default();
    let folded = target_name.to_lowercase();

    if mentions(&folded, REVIEW_WORDS) {
        score += REVIEW_BONUS;
        rationale.push(format!(
            "target '{target_name}' looks like a review stage ({REVIEW_BONUS:+.1})"
        ));
    }
    if mentions(&folded, QA_WORDS) {
        let bonus = if qa_tagged { QA_TAGGED_BONUS } else { QA_BONUS };
        score += bonus;
        if qa_tagged {
            rationale.push(format!(
                "target '{target_name}' looks like QA and the task is tagged for QA ({bonus:+.1})"
            ));
        } else {
            rationale.push(format!("target '{target_name}' looks like QA ({bonus:+.1})"));
        }
    }
    if mentions(&folded, COMPLETION_WORDS) {
        let bonus = priority_weight(priority);
        score += bonus;
        let level = priority.map_or("unset", Priority::as_str);
        rationale.push(format!(
            "target '{target_name}' completes the task at {level} priority ({bonus:+.1})"
        ));
    }
    if mentions(&folded, IN_PROGRESS_WORDS) {
        score += IN_PROGRESS_BONUS;
        rationale.push(format!(
            "target '{target_name}' starts work ({IN_PROGRESS_BONUS:+.1})"
        ));
    }
    if let (Some(entry), Some(from), Some(target)) =
        (latest, candidate.from_status_id, candidate.to_status.as_ref())
        && entry.from_status_id == from
        && entry.to_status_id == target.status_id
    {
        score += REPEAT_BONUS;
        rationale.push(format!("repeats the most recent move ({REPEAT_BONUS:+.1})"));
    }
    if rationale.is_empty() {
        rationale.push(format!("'{target_name}' is an available next step"));
    }

    Scored {
        candidate,
        score,
        rationale,
    }
}

const fn priority_weight(priority: Option<Priority>) -> f64 {
    match priority {
        None | Some(Priority::Medium) => 0.6,
        Some(Priority::Low) => 0.4,
        Some(Priority::High) => 0.9,
        Some(Priority::Urgent) => 1.2,
    }
}

fn mentions(folded_name: &str, words: &[&str]) -> bool {
    words.iter().any(|word| folded_name.contains(word))
}

fn is_qa_tag(tag: &str) -> bool {
    QA_TAGS
        .iter()
        .any(|candidate| tag.trim().eq_ignore_ascii_case(candidate))
}
