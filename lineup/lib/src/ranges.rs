//! Highlight range parsing.
//!
//! A code block selects the lines it wants emphasized with a compact,
//! comma-separated list of line numbers and inclusive ranges:
//!
//! ```text
//! data-highlight="1,4-6,10"
//! ```
//!
//! Parsing is permissive. Tokens that are malformed, reversed, or reach
//! outside the block contribute nothing and never produce an error.
//!
//! ## Examples
//!
//! ```
//! use lineup_lib::ranges::parse_ranges;
//!
//! let set = parse_ranges(Some("13,24-26,25-27"), 100);
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![13, 24, 25, 26, 27]);
//!
//! let set = parse_ranges(Some("0,5,200"), 10);
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![5]);
//! ```

use std::collections::BTreeSet;

/// The set of 1-based line numbers to highlight in one block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightSet(BTreeSet<usize>);

impl HighlightSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if a line number should be highlighted.
    pub fn contains(&self, line: usize) -> bool {
        self.0.contains(&line)
    }

    /// Number of highlighted lines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highlighted lines in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    fn insert_range(&mut self, range: ValidLineRange) {
        self.0.extend(range.start..=range.end);
    }
}

/// Inclusive line range with `1 <= start <= end <= max` enforced at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValidLineRange {
    start: usize,
    end: usize,
}

impl ValidLineRange {
    fn new(start: usize, end: usize, max: usize) -> Option<Self> {
        (start >= 1 && start <= end && end <= max).then_some(Self { start, end })
    }

    fn single(line: usize, max: usize) -> Option<Self> {
        Self::new(line, line, max)
    }
}

/// Parses a highlight list against a block of `max` lines.
///
/// Each comma-separated token is first read as a single line number. If that
/// fails (or the number is out of range) it is read as a `lower-upper` pair.
/// A pair whose bounds are reversed is rejected rather than swapped.
///
/// ```
/// use lineup_lib::ranges::parse_ranges;
///
/// assert!(parse_ranges(Some("3-1"), 10).is_empty());
/// assert!(parse_ranges(None, 10).is_empty());
/// assert!(parse_ranges(Some(" 2 - 3 "), 10).contains(3));
/// ```
pub fn parse_ranges(spec: Option<&str>, max: usize) -> HighlightSet {
    let mut set = HighlightSet::new();
    let Some(spec) = spec else {
        return set;
    };

    for token in spec.split(',') {
        if let Some(range) = parse_token(token.trim(), max) {
            set.insert_range(range);
        }
    }

    set
}

fn parse_token(token: &str, max: usize) -> Option<ValidLineRange> {
    if let Some(range) = token
        .parse::<usize>()
        .ok()
        .and_then(|line| ValidLineRange::single(line, max))
    {
        return Some(range);
    }

    let parts: Vec<&str> = token.split('-').collect();
    let [lower, upper] = parts.as_slice() else {
        return None;
    };
    let lower = lower.trim().parse::<usize>().ok()?;
    let upper = upper.trim().parse::<usize>().ok()?;

    ValidLineRange::new(lower, upper, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(set: &HighlightSet) -> Vec<usize> {
        set.iter().collect()
    }

    #[test]
    fn overlapping_ranges_merge_into_unique_members() {
        let set = parse_ranges(Some("13,24-26,25-27"), 100);
        assert_eq!(lines(&set), vec![13, 24, 25, 26, 27]);
    }

    #[test]
    fn out_of_range_tokens_are_dropped() {
        let set = parse_ranges(Some("0,5,200"), 10);
        assert_eq!(lines(&set), vec![5]);
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(parse_ranges(Some("3-1"), 10).is_empty());
    }

    #[test]
    fn range_reaching_past_max_is_rejected_whole() {
        assert!(parse_ranges(Some("8-12"), 10).is_empty());
        assert_eq!(lines(&parse_ranges(Some("8-10"), 10)), vec![8, 9, 10]);
    }

    #[test]
    fn empty_and_absent_lists_yield_empty_set() {
        assert!(parse_ranges(None, 10).is_empty());
        assert!(parse_ranges(Some(""), 10).is_empty());
        assert!(parse_ranges(Some(" , ,"), 10).is_empty());
    }

    #[test]
    fn malformed_tokens_do_not_poison_valid_ones() {
        let set = parse_ranges(Some("abc,2,1-2-3,x-4,4-y,-3,6"), 10);
        assert_eq!(lines(&set), vec![2, 6]);
    }

    #[test]
    fn whitespace_around_tokens_and_bounds_is_ignored() {
        let set = parse_ranges(Some(" 1 , 3 - 4 "), 10);
        assert_eq!(lines(&set), vec![1, 3, 4]);
    }

    #[test]
    fn zero_max_never_highlights() {
        assert!(parse_ranges(Some("1,1-1"), 0).is_empty());
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn members_always_within_bounds(spec in "[0-9, -]{0,40}", max in 0usize..60) {
            let set = parse_ranges(Some(&spec), max);
            for line in set.iter() {
                prop_assert!(line >= 1 && line <= max);
            }
        }

        #[test]
        fn parsing_is_deterministic(spec in "[0-9a-z, -]{0,40}", max in 0usize..60) {
            prop_assert_eq!(parse_ranges(Some(&spec), max), parse_ranges(Some(&spec), max));
        }

        #[test]
        fn valid_range_contains_exactly_its_span(lower in 1usize..50, len in 0usize..20) {
            let upper = lower + len;
            let set = parse_ranges(Some(&format!("{lower}-{upper}")), 100);
            prop_assert_eq!(set.len(), len + 1);
            prop_assert!(set.contains(lower) && set.contains(upper));
            prop_assert!(!set.contains(lower - 1) && !set.contains(upper + 1));
        }
    }
}
