use crate::{line::Line, nav_list::NavList};
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

// above this many lines the scan runs on the rayon pool
const PARALLEL_THRESHOLD: usize = 1000;

/// live case-insensitive substring search with a cyclic cursor
///
/// a state is built for one query and replaced in full when the query
/// changes; there is no incremental refinement.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    matcher: Option<Regex>,
    matches: NavList,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// scan `lines` in file order for `query`
    ///
    /// the cursor starts on the first match. an empty query, or one with no
    /// matches, leaves the cursor inactive.
    pub fn with_query(lines: &[Line], query: &str) -> Self {
        let Some(matcher) = build_matcher(query) else {
            return Self {
                query: query.to_string(),
                ..Self::default()
            };
        };

        let indices: Vec<usize> = if lines.len() > PARALLEL_THRESHOLD {
            lines
                .par_iter()
                .filter(|line| matcher.is_match(&line.text))
                .map(|line| line.index)
                .collect()
        } else {
            lines
                .iter()
                .filter(|line| matcher.is_match(&line.text))
                .map(|line| line.index)
                .collect()
        };

        log::debug!("Search '{}' matched {} line(s)", query, indices.len());

        let mut matches = NavList::new(indices);
        matches.select_first();

        Self {
            query: query.to_string(),
            matcher: Some(matcher),
            matches,
        }
    }

    pub fn set_query(&mut self, lines: &[Line], query: &str) {
        *self = Self::with_query(lines, query);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[usize] {
        self.matches.positions()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.matches.current().is_some()
    }

    /// line index of the current match
    pub fn current(&self) -> Option<usize> {
        self.matches.current()
    }

    pub fn next(&mut self) -> Option<usize> {
        self.matches.select_next_circular()
    }

    pub fn previous(&mut self) -> Option<usize> {
        self.matches.select_previous_circular()
    }

    /// `"<pos>/<total>"` while there are matches
    pub fn counter(&self) -> Option<String> {
        if self.matches.is_empty() {
            return None;
        }
        Some(format!(
            "{}/{}",
            self.matches.display_position(),
            self.matches.len()
        ))
    }

    /// byte ranges of the current query in `text`, reusing the compiled matcher
    pub fn highlight_ranges(&self, text: &str) -> Vec<Range<usize>> {
        self.matcher
            .as_ref()
            .map_or_else(Vec::new, |matcher| match_ranges(matcher, text))
    }
}

/// one matcher per query: the escaped literal under simple case folding, so
/// every case variant of a char matches regardless of its position in a word
fn build_matcher(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }

    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(matcher) => Some(matcher),
        Err(e) => {
            log::error!("Cannot search for '{}': {}", query, e);
            None
        }
    }
}

fn match_ranges(matcher: &Regex, text: &str) -> Vec<Range<usize>> {
    matcher.find_iter(text).map(|found| found.range()).collect()
}

/// byte ranges of case-insensitive occurrences of `query` in `text`
pub fn highlight_ranges(text: &str, query: &str) -> Vec<Range<usize>> {
    build_matcher(query).map_or_else(Vec::new, |matcher| match_ranges(&matcher, text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::parse;

    const SCENARIO: &str = "2024/01/02-03:04:05.006 ERROR - disk fault\nplain line\n2024/01/02-03:04:06.000 INFO - ok";

    #[test]
    fn test_empty_query_has_no_matches() {
        let lines = parse(SCENARIO);
        let state = SearchState::with_query(&lines, "");
        assert!(state.is_empty());
        assert!(!state.is_active());
        assert_eq!(state.current(), None);
        assert_eq!(state.counter(), None);
    }

    #[test]
    fn test_empty_query_navigation_is_noop() {
        let mut state = SearchState::with_query(&parse(SCENARIO), "");
        assert_eq!(state.next(), None);
        assert_eq!(state.previous(), None);
    }

    #[test]
    fn test_scenario_single_match_cycle() {
        let lines = parse(SCENARIO);
        let mut state = SearchState::with_query(&lines, "fault");
        assert_eq!(state.matches(), &[0]);
        assert_eq!(state.current(), Some(0));
        assert_eq!(state.next(), Some(0));
        assert_eq!(state.previous(), Some(0));
    }

    #[test]
    fn test_case_insensitive() {
        let lines = parse(SCENARIO);
        let state = SearchState::with_query(&lines, "DISK FAULT");
        assert_eq!(state.matches(), &[0]);

        let state = SearchState::with_query(&lines, "Line");
        assert_eq!(state.matches(), &[1]);
    }

    #[test]
    fn test_unicode_case_folding() {
        let lines = parse("ÜBERLAUF im Puffer\nplain\nüberlauf again");
        let state = SearchState::with_query(&lines, "überlauf");
        assert_eq!(state.matches(), &[0, 2]);
    }

    #[test]
    fn test_cursor_starts_on_first_match() {
        let lines = parse(SCENARIO);
        let mut state = SearchState::with_query(&lines, "2024");
        assert_eq!(state.matches(), &[0, 2]);
        assert_eq!(state.current(), Some(0));
        assert_eq!(state.counter(), Some("1/2".to_string()));
        assert_eq!(state.next(), Some(2));
        assert_eq!(state.counter(), Some("2/2".to_string()));
        assert_eq!(state.next(), Some(0));
    }

    #[test]
    fn test_previous_wraps_to_last() {
        let lines = parse(SCENARIO);
        let mut state = SearchState::with_query(&lines, "2024");
        assert_eq!(state.previous(), Some(2));
        assert_eq!(state.previous(), Some(0));
    }

    #[test]
    fn test_no_matches_is_inactive() {
        let lines = parse(SCENARIO);
        let mut state = SearchState::with_query(&lines, "nowhere");
        assert!(!state.is_active());
        assert_eq!(state.next(), None);
        assert_eq!(state.query(), "nowhere");
    }

    #[test]
    fn test_set_query_resets_cursor() {
        let lines = parse(SCENARIO);
        let mut state = SearchState::new();
        state.set_query(&lines, "2024");
        state.next();
        assert_eq!(state.current(), Some(2));
        state.set_query(&lines, "2024/01");
        assert_eq!(state.current(), Some(0));
        state.set_query(&lines, "");
        assert!(!state.is_active());
    }

    #[test]
    fn test_large_input_matches_in_order() {
        let content: String = (0..3000)
            .map(|i| {
                if i % 10 == 0 {
                    format!("{} Needle", i)
                } else {
                    format!("{} hay", i)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        let lines = parse(&content);
        let state = SearchState::with_query(&lines, "needle");
        let expected: Vec<usize> = (0..3000).filter(|i| i % 10 == 0).collect();
        assert_eq!(state.matches(), expected.as_slice());
    }

    #[test]
    fn test_highlight_ranges() {
        assert_eq!(highlight_ranges("Disk fault, disk", "DISK"), vec![0..4, 12..16]);
        assert_eq!(highlight_ranges("abc", ""), Vec::<Range<usize>>::new());
        assert_eq!(highlight_ranges("abc", "x"), Vec::<Range<usize>>::new());
    }

    #[test]
    fn test_highlight_ranges_non_ascii() {
        assert_eq!(highlight_ranges("größe Größe", "GRÖSSE"), Vec::<Range<usize>>::new());
        assert_eq!(highlight_ranges("Größe", "größe"), vec![0..7]);
    }

    #[test]
    fn test_highlight_ranges_map_onto_original_text() {
        // 'İ' lowercases to two chars; ranges still index the original text
        assert_eq!(highlight_ranges("İstanbul", "stan"), vec![2..6]);
    }

    #[test]
    fn test_final_sigma_matches_in_any_position() {
        let lines = parse("ΟΣΑ alarm\nΟΔΟΣ closed");
        assert_eq!(SearchState::with_query(&lines, "ΟΣ").matches(), &[0, 1]);
        assert_eq!(SearchState::with_query(&lines, "Σ").matches(), &[0, 1]);
        assert_eq!(SearchState::with_query(&lines, "ος").matches(), &[0, 1]);
        assert_eq!(highlight_ranges("ΟΔΟΣ closed", "ΟΣ"), vec![4..8]);
    }

    #[test]
    fn test_query_is_literal() {
        let lines = parse("a.c\nabc\n(x)");
        assert_eq!(SearchState::with_query(&lines, "a.c").matches(), &[0]);
        assert_eq!(SearchState::with_query(&lines, "(x)").matches(), &[2]);
    }

    #[test]
    fn test_state_highlight_ranges() {
        let state = SearchState::with_query(&[], "disk");
        assert_eq!(state.highlight_ranges("Disk fault, DISK"), vec![0..4, 12..16]);
        assert!(SearchState::new().highlight_ranges("disk").is_empty());
    }
}
