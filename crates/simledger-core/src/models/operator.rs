//! Operator and prefix table models
//!
//! Operators are static reference data seeded once. Prefix entries map a
//! 3- or 4-digit numeric prefix to an operator for intake-time resolution.

use serde::{Deserialize, Serialize};

/// Carrier identity (Globe, Smart, DITO, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    /// Unique identifier
    pub id: i32,

    /// Carrier name
    pub name: String,
}

/// One row of the prefix table
///
/// Prefixes come in exactly two widths (4 and 3 digits); lookup tries the
/// 4-digit candidate before the 3-digit one. Multiple entries may map to the
/// same operator; a prefix value is unique within the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixEntry {
    /// Unique identifier
    pub id: i32,

    /// Numeric prefix string, e.g. "917" or "9175"
    pub prefix: String,

    /// Operator this prefix belongs to
    pub operator_id: i32,
}

impl PrefixEntry {
    /// Prefix widths tried during operator resolution, longest first
    pub const CANDIDATE_WIDTHS: [usize; 2] = [4, 3];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_widths_longest_first() {
        assert_eq!(PrefixEntry::CANDIDATE_WIDTHS, [4, 3]);
    }
}
