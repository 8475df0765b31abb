use lazy_static::lazy_static;
use regex::Regex;
use std::{cmp::Ordering, fmt, str::FromStr};

/// severity tag detected in a log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Info,
    Note,
    Warning,
    Debug,
    Error,
}

impl Category {
    /// declaration order, which is also the classification order
    pub const ALL: [Category; 5] = [
        Category::Info,
        Category::Note,
        Category::Warning,
        Category::Debug,
        Category::Error,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Info => "INFO",
            Category::Note => "NOTE",
            Category::Warning => "WARNING",
            Category::Debug => "DEBUG",
            Category::Error => "ERROR",
        }
    }
}

// display order is alphabetical by label, independent of declaration order
impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        self.label().cmp(other.label())
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}' (expected one of INFO, NOTE, WARNING, DEBUG, ERROR)")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Category::ALL
            .into_iter()
            .find(|cat| cat.label() == upper)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

lazy_static! {
    // matches ".*\bLABEL\b\s*-\s*.*" anywhere in the uppercased line;
    // the leading and trailing ".*" are implied by an unanchored search
    static ref CATEGORY_PATTERNS: Vec<(Category, Regex)> = Category::ALL
        .iter()
        .map(|&cat| {
            let pattern = format!(r"\b{}\b\s*-", cat.label());
            (cat, Regex::new(&pattern).unwrap())
        })
        .collect();
}

/// classify a raw line into at most one category
///
/// the line is uppercased first, then every category is tried in declaration
/// order. the first category whose label appears as a whole word followed by
/// a `-` wins, even when another label occurs earlier in the text.
pub fn classify(raw_line: &str) -> Option<Category> {
    if raw_line.is_empty() {
        return None;
    }

    let upper = raw_line.to_uppercase();
    CATEGORY_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(&upper))
        .map(|(cat, _)| *cat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_empty_line() {
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_classify_plain_line() {
        assert_eq!(classify("plain line"), None);
        assert_eq!(classify("   "), None);
    }

    #[test]
    fn test_classify_each_label() {
        assert_eq!(classify("INFO - started"), Some(Category::Info));
        assert_eq!(classify("NOTE - cache warm"), Some(Category::Note));
        assert_eq!(classify("WARNING - low disk"), Some(Category::Warning));
        assert_eq!(classify("DEBUG - tick"), Some(Category::Debug));
        assert_eq!(classify("ERROR - disk fault"), Some(Category::Error));
    }

    #[test]
    fn test_classify_with_timestamp_prefix() {
        let line = "2024/01/02-03:04:05.006 ERROR - disk fault";
        assert_eq!(classify(line), Some(Category::Error));
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("error - disk fault"), Some(Category::Error));
        assert_eq!(classify("Warning - low disk"), Some(Category::Warning));
    }

    #[test]
    fn test_classify_allows_whitespace_around_hyphen() {
        assert_eq!(classify("WARNING  -  low disk"), Some(Category::Warning));
        assert_eq!(classify("DEBUG-tick"), Some(Category::Debug));
        assert_eq!(classify("DEBUG\t- tick"), Some(Category::Debug));
    }

    #[test]
    fn test_classify_requires_hyphen_after_label() {
        assert_eq!(classify("ERROR: disk fault"), None);
        assert_eq!(classify("ERROR disk - fault"), None);
        assert_eq!(classify("[ERROR] - disk fault"), None);
    }

    #[test]
    fn test_classify_requires_whole_word() {
        assert_eq!(classify("ERRORS - many"), None);
        assert_eq!(classify("MY_ERROR - x"), None);
        assert_eq!(classify("NOINFO - x"), None);
    }

    #[test]
    fn test_classify_declaration_order_wins() {
        // ERROR appears first in the text, INFO is declared first
        let line = "ERROR - retry failed, INFO - giving up";
        assert_eq!(classify(line), Some(Category::Info));

        let line = "DEBUG - x WARNING - y";
        assert_eq!(classify(line), Some(Category::Warning));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let line = "03:04 NOTE - maintenance window";
        assert_eq!(classify(line), classify(line));
    }

    #[test]
    fn test_display_order_is_by_label() {
        let mut cats = Category::ALL.to_vec();
        cats.sort();
        let labels: Vec<&str> = cats.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["DEBUG", "ERROR", "INFO", "NOTE", "WARNING"]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("error".parse::<Category>(), Ok(Category::Error));
        assert_eq!(" Warning ".parse::<Category>(), Ok(Category::Warning));
        assert!("fatal".parse::<Category>().is_err());
    }

    #[test]
    fn test_parse_error_message() {
        let err = "fatal".parse::<Category>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown category 'fatal' (expected one of INFO, NOTE, WARNING, DEBUG, ERROR)"
        );
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Category::Note.to_string(), "NOTE");
    }
}
