use crate::line::Line;
use chrono::{DateTime, TimeZone, Utc};
use logmate_parser::{Category, extract_timestamp, format_in};
use std::{collections::BTreeMap, fmt};

/// aggregate statistics over a parsed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_lines: usize,
    /// every category is present, zero-filled when it never occurs
    pub category_counts: BTreeMap<Category, usize>,
    pub earliest_timestamp: Option<DateTime<Utc>>,
    pub latest_timestamp: Option<DateTime<Utc>>,
}

/// count categories and fold timestamps into a range, in one pass
pub fn build_summary(lines: &[Line]) -> Summary {
    let mut category_counts: BTreeMap<Category, usize> =
        Category::ALL.iter().map(|&cat| (cat, 0)).collect();
    let mut earliest: Option<DateTime<Utc>> = None;
    let mut latest: Option<DateTime<Utc>> = None;

    for line in lines {
        if let Some(cat) = line.category {
            *category_counts.entry(cat).or_insert(0) += 1;
        }

        if let Some(ts) = extract_timestamp(&line.text) {
            earliest = Some(earliest.map_or(ts, |current| current.min(ts)));
            latest = Some(latest.map_or(ts, |current| current.max(ts)));
        }
    }

    Summary {
        total_lines: lines.len(),
        category_counts,
        earliest_timestamp: earliest,
        latest_timestamp: latest,
    }
}

impl Summary {
    pub fn count(&self, cat: Category) -> usize {
        self.category_counts.get(&cat).copied().unwrap_or(0)
    }

    /// number of lines that carry any category
    pub fn categorized_lines(&self) -> usize {
        self.category_counts.values().sum()
    }

    /// non-zero counts in declaration order
    pub fn visible_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|&cat| (cat, self.count(cat)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// text rows of the statistics panel, timestamps rendered in `tz`
    pub fn stats_lines<Tz>(&self, tz: &Tz) -> Vec<String>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut rows = vec![format!("Total Lines: {}", self.total_lines)];

        match (&self.earliest_timestamp, &self.latest_timestamp) {
            (Some(earliest), Some(latest)) => {
                rows.push(format!("Earliest: {}", format_in(earliest, tz)));
                rows.push(format!("Latest:   {}", format_in(latest, tz)));
            }
            _ => rows.push("No timestamps found.".to_string()),
        }

        for (cat, count) in self.visible_counts() {
            rows.push(format!("{}: {}", cat, count));
        }

        rows
    }
}
