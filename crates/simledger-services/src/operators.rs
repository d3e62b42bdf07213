//! Operator resolution service
//!
//! Maps a raw phone number to its carrier by greedy longest-prefix-first
//! matching over exactly two fixed widths: the 4-digit candidate is tried
//! before the 3-digit one, each as a single exact lookup against the prefix
//! table. This is not a general trie; 2- or 5-digit prefixes are out of scope.

use crate::phone;
use simledger_core::{
    models::Operator,
    traits::PrefixRepository,
    AppError, AppResult,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Operator resolution over an injected prefix table
pub struct OperatorResolver<P: PrefixRepository> {
    prefix_repo: Arc<P>,
}

impl<P: PrefixRepository> OperatorResolver<P> {
    /// Create a new resolver
    pub fn new(prefix_repo: Arc<P>) -> Self {
        Self { prefix_repo }
    }

    /// Resolve the operator for a raw number
    ///
    /// # Errors
    ///
    /// Returns `AppError::OperatorNotFound` when neither candidate matches.
    /// Callers in the number-creation flow must reject the creation with a
    /// field-level error and persist nothing.
    #[instrument(skip(self))]
    pub async fn resolve_operator(&self, raw_number: &str) -> AppResult<Operator> {
        let candidates = phone::prefix_candidates(raw_number);
        debug!(?candidates, "Resolving operator");

        for candidate in &candidates {
            if let Some(entry) = self.prefix_repo.find_by_prefix(candidate).await? {
                debug!(prefix = %candidate, operator_id = entry.operator_id, "Prefix matched");

                return self
                    .prefix_repo
                    .find_operator(entry.operator_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!(
                            "Prefix {} references missing operator {}",
                            entry.prefix, entry.operator_id
                        ))
                    });
            }
        }

        warn!(number = %raw_number.trim(), "No operator found for number prefix");
        Err(AppError::OperatorNotFound(raw_number.trim().to_string()))
    }
}
