//! Phone number normalization helpers
//!
//! Two deliberately distinct reductions live here and must not be unified:
//!
//! - `normalize_search` produces the canonical "local, no leading zero" form
//!   used for substring search against stored numbers.
//! - `prefix_candidates` produces the intake-time lookup keys for operator
//!   resolution: strip every leading zero, then take the first 4 and first 3
//!   characters, longest first.

use simledger_core::models::PrefixEntry;

/// Canonicalize a raw number for search comparisons
///
/// Rules, applied in order: trim whitespace; strip a literal `+63` prefix;
/// otherwise strip one leading `0` when the value is exactly 11 characters;
/// otherwise return unchanged.
pub fn normalize_search(raw: &str) -> String {
    let raw = raw.trim();

    if let Some(rest) = raw.strip_prefix("+63") {
        return rest.to_string();
    }

    if raw.starts_with('0') && raw.chars().count() == 11 {
        return raw.chars().skip(1).collect();
    }

    raw.to_string()
}

/// Intake-time prefix lookup keys, longest width first
///
/// Strips all leading `0`s (not just one, and not length-conditioned), then
/// yields the first 4 and first 3 characters of what remains. A width longer
/// than the stripped string is skipped, so a value stripped to fewer than
/// 3 characters yields no candidates.
pub fn prefix_candidates(raw: &str) -> Vec<String> {
    let stripped = raw.trim().trim_start_matches('0');

    PrefixEntry::CANDIDATE_WIDTHS
        .iter()
        .filter(|&&width| stripped.chars().count() >= width)
        .map(|&width| stripped.chars().take(width).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_country_code() {
        assert_eq!(normalize_search("+639171234567"), "9171234567");
    }

    #[test]
    fn test_normalize_strips_leading_zero_when_eleven_chars() {
        assert_eq!(normalize_search("09171234567"), "9171234567");
    }

    #[test]
    fn test_normalize_leaves_local_form_unchanged() {
        assert_eq!(normalize_search("9171234567"), "9171234567");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_search("  09171234567 "), "9171234567");
    }

    #[test]
    fn test_normalize_short_zero_prefixed_value_unchanged() {
        // Starts with 0 but is not 11 characters, so the rule does not fire
        assert_eq!(normalize_search("0917123"), "0917123");
    }

    #[test]
    fn test_candidates_longest_first() {
        assert_eq!(prefix_candidates("9171234567"), vec!["9171", "917"]);
    }

    #[test]
    fn test_candidates_strip_all_leading_zeros() {
        // All leading zeros go, unlike the search normalizer
        assert_eq!(prefix_candidates("009171234567"), vec!["9171", "917"]);
    }

    #[test]
    fn test_candidates_short_value_skips_widths() {
        assert_eq!(prefix_candidates("917"), vec!["917"]);
        assert_eq!(prefix_candidates("91"), Vec::<String>::new());
    }

    #[test]
    fn test_candidates_all_zeros_yield_nothing() {
        assert_eq!(prefix_candidates("000"), Vec::<String>::new());
    }
}
