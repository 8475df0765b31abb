use crate::{
    category_index::CategoryIndex,
    line::{Line, parse},
    search::SearchState,
    summary::{Summary, build_summary},
};
use logmate_parser::Category;
use std::time::Instant;

/// everything derived from one successful load; replaced wholesale on reload
#[derive(Debug, Clone)]
pub struct LoadedLog {
    pub lines: Vec<Line>,
    pub summary: Summary,
    pub category_index: CategoryIndex,
}

impl LoadedLog {
    /// parse, summarize and index `content`
    pub fn from_content(content: &str) -> Self {
        let started = Instant::now();

        let lines = parse(content);
        let summary = build_summary(&lines);
        let category_index = CategoryIndex::build(&lines);

        log::debug!(
            "Loaded {} lines ({} categorized) in {:?}",
            summary.total_lines,
            summary.categorized_lines(),
            started.elapsed()
        );

        Self {
            lines,
            summary,
            category_index,
        }
    }
}

/// view state for one loaded file: search, cursors and the selected line
pub struct LogSession {
    loaded: LoadedLog,
    search: SearchState,
    selected_line: Option<usize>,
}

impl LogSession {
    pub fn new(loaded: LoadedLog) -> Self {
        Self {
            loaded,
            search: SearchState::new(),
            selected_line: None,
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.loaded.lines
    }

    pub fn summary(&self) -> &Summary {
        &self.loaded.summary
    }

    pub fn category_index(&self) -> &CategoryIndex {
        &self.loaded.category_index
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn selected_line(&self) -> Option<usize> {
        self.selected_line
    }

    /// the line to highlight: the current search match while a query is
    /// typed, otherwise the selected line
    pub fn highlighted_line(&self) -> Option<usize> {
        if self.search.query().is_empty() {
            self.selected_line
        } else {
            self.search.current()
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.search.set_query(&self.loaded.lines, query);
    }

    pub fn next_match(&mut self) -> Option<usize> {
        self.search.next()
    }

    pub fn previous_match(&mut self) -> Option<usize> {
        self.search.previous()
    }

    pub fn next_in_category(&mut self, cat: Category) -> Option<usize> {
        let index = self.loaded.category_index.next(cat)?;
        self.selected_line = Some(index);
        Some(index)
    }

    pub fn previous_in_category(&mut self, cat: Category) -> Option<usize> {
        let index = self.loaded.category_index.previous(cat)?;
        self.selected_line = Some(index);
        Some(index)
    }

    pub fn category_label(&self, cat: Category) -> String {
        self.loaded.category_index.label(cat)
    }

    /// all lines of `cat` joined by newlines, `None` if `cat` does not occur
    pub fn category_text(&self, cat: Category) -> Option<String> {
        if !self.loaded.category_index.contains(cat) {
            return None;
        }
        Some(
            self.loaded
                .category_index
                .collect_text(&self.loaded.lines, cat),
        )
    }

    /// select a line, clamped to the last one
    pub fn select(&mut self, index: usize) -> Option<usize> {
        let last = self.loaded.lines.len().checked_sub(1)?;
        let index = index.min(last);
        self.selected_line = Some(index);
        Some(index)
    }

    pub fn select_first(&mut self) -> Option<usize> {
        self.select(0)
    }

    pub fn select_last(&mut self) -> Option<usize> {
        self.select(usize::MAX)
    }

    /// move the selection by `delta` lines without wrapping; with nothing
    /// selected yet the first line is selected
    pub fn move_selection(&mut self, delta: isize) -> Option<usize> {
        match self.selected_line {
            Some(current) => self.select(current.saturating_add_signed(delta)),
            None => self.select_first(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    const SCENARIO: &str = "2024/01/02-03:04:05.006 ERROR - disk fault\nplain line\n2024/01/02-03:04:06.000 INFO - ok";

    fn session(content: &str) -> LogSession {
        LogSession::new(LoadedLog::from_content(content))
    }

    #[test]
    fn test_scenario_pipeline() {
        let loaded = LoadedLog::from_content(SCENARIO);
        assert_eq!(loaded.lines.len(), 3);
        assert_eq!(loaded.lines[0].category, Some(Category::Error));
        assert_eq!(loaded.lines[1].category, None);
        assert_eq!(loaded.lines[2].category, Some(Category::Info));

        let earliest = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(3, 4, 5, 6)
            .unwrap()
            .and_utc();
        assert_eq!(loaded.summary.earliest_timestamp, Some(earliest));
        assert_eq!(
            loaded.summary.earliest_timestamp.map(|ts| ts.to_rfc3339()),
            Some("2024-01-02T03:04:05.006+00:00".to_string())
        );
        assert_eq!(loaded.summary.count(Category::Error), 1);
        assert_eq!(loaded.summary.count(Category::Info), 1);

        let cats: Vec<Category> = loaded.category_index.categories().collect();
        assert_eq!(cats, vec![Category::Error, Category::Info]);
    }

    #[test]
    fn test_category_navigation_selects_line() {
        let mut session = session(SCENARIO);
        assert_eq!(session.selected_line(), None);
        assert_eq!(session.next_in_category(Category::Info), Some(2));
        assert_eq!(session.highlighted_line(), Some(2));
        assert_eq!(session.previous_in_category(Category::Error), Some(0));
        assert_eq!(session.highlighted_line(), Some(0));
    }

    #[test]
    fn test_absent_category_keeps_selection() {
        let mut session = session(SCENARIO);
        session.select(1);
        assert_eq!(session.next_in_category(Category::Warning), None);
        assert_eq!(session.selected_line(), Some(1));
        assert_eq!(session.category_text(Category::Warning), None);
        assert_eq!(session.category_label(Category::Warning), "WARNING");
    }

    #[test]
    fn test_search_overrides_highlight_while_query_set() {
        let mut session = session(SCENARIO);
        session.select(1);
        session.set_query("ok");
        assert_eq!(session.highlighted_line(), Some(2));

        // a query without matches highlights nothing
        session.set_query("zzz");
        assert_eq!(session.highlighted_line(), None);

        session.set_query("");
        assert_eq!(session.highlighted_line(), Some(1));
    }

    #[test]
    fn test_search_navigation() {
        let mut session = session(SCENARIO);
        session.set_query("fault");
        assert_eq!(session.next_match(), Some(0));
        assert_eq!(session.previous_match(), Some(0));
        assert_eq!(session.search().counter(), Some("1/1".to_string()));
    }

    #[test]
    fn test_select_is_clamped() {
        let mut session = session(SCENARIO);
        assert_eq!(session.select(10), Some(2));
        assert_eq!(session.select_first(), Some(0));
        assert_eq!(session.select_last(), Some(2));
    }

    #[test]
    fn test_move_selection_does_not_wrap() {
        let mut session = session(SCENARIO);
        assert_eq!(session.move_selection(1), Some(0));
        assert_eq!(session.move_selection(1), Some(1));
        assert_eq!(session.move_selection(5), Some(2));
        assert_eq!(session.move_selection(-10), Some(0));
    }

    #[test]
    fn test_category_text() {
        let session = session("ERROR - a\nINFO - b\nERROR - c");
        assert_eq!(
            session.category_text(Category::Error),
            Some("ERROR - a\nERROR - c".to_string())
        );
    }

    #[test]
    fn test_reload_replaces_everything() {
        let mut first = session(SCENARIO);
        first.next_in_category(Category::Error);
        first.set_query("fault");

        let second = session("WARNING - fresh");
        assert_eq!(second.lines().len(), 1);
        assert_eq!(second.selected_line(), None);
        assert_eq!(second.search().query(), "");
        assert!(second.category_index().contains(Category::Warning));
        assert!(!second.category_index().contains(Category::Error));
    }

    #[test]
    fn test_stats_lines_through_session() {
        let session = session(SCENARIO);
        let rows = session.summary().stats_lines(&Utc);
        assert_eq!(rows[0], "Total Lines: 3");
    }
}
