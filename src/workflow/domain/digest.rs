//! Content digests of published workflow drafts.

use super::{WorkflowDomainError, WorkflowDraft};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 digest of a draft's canonical JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkflowDigest(String);

impl WorkflowDigest {
    /// Computes the digest of `draft`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::Canonicalization`] when the draft
    /// cannot be serialized.
    pub fn of_draft(draft: &WorkflowDraft) -> Result<Self, WorkflowDomainError> {
        let canonical = serde_json::to_vec(draft)
            .map_err(|err| WorkflowDomainError::Canonicalization(err.to_string()))?;
        let hash = Sha256::digest(&canonical);
        let encoded = hash.iter().map(|byte| format!("{byte:02x}")).collect();
        Ok(Self(encoded))
    }

    /// Wraps a digest read back from storage.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkflowDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
