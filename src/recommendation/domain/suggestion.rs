//! The suggestion returned to clients.

use crate::workflow::domain::{TransitionId, TransitionKey};
use serde::Serialize;
use std::fmt;

/// Suggestion confidence, held in thousandths.
///
/// Confidence is rounded to three decimals and never exceeds
/// [`Confidence::CAP`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "f64")]
pub struct Confidence(u16);

impl Confidence {
    /// Highest confidence the scorer may report (0.95).
    pub const CAP: Self = Self(950);

    /// Creates a confidence from thousandths, saturating at [`Self::CAP`].
    #[must_use]
    pub const fn from_thousandths(thousandths: u16) -> Self {
        if thousandths > Self::CAP.0 {
            Self::CAP
        } else {
            Self(thousandths)
        }
    }

    /// Returns the confidence in thousandths.
    #[must_use]
    pub const fn thousandths(self) -> u16 {
        self.0
    }

    /// Returns the confidence as a fraction in `[0, 0.95]`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "confidence is reported to clients as a fraction"
    )]
    pub fn value(self) -> f64 {
        f64::from(self.0) / 1000.0
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.value()
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.value())
    }
}

/// A ranked next step for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionSuggestion {
    /// Suggested transition.
    pub transition_id: TransitionId,
    /// Suggested transition key.
    pub transition_key: TransitionKey,
    /// How sure the scorer is.
    pub confidence: Confidence,
    /// Human-readable reasons, in the order they were applied.
    pub rationale: Vec<String>,
}
