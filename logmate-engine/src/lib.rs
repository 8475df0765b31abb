//! # logmate-engine
//!
//! Turns the text of a log file into a categorized, searchable, navigable
//! view of its lines.
//!
//! ## Data flow
//!
//! ```text
//! raw text ──parse()──> Vec<Line> ──┬──> build_summary()      -> Summary
//!                                   ├──> CategoryIndex::build() -> per-category cursors
//!                                   └──> SearchState::with_query() -> match cursor
//! ```
//!
//! [`LoadedLog`] bundles the immutable products of one load and
//! [`LogSession`] adds the mutable navigation state a viewer keeps on top.
//!
//! The engine never performs I/O. Callers read the file, check that it is
//! UTF-8, and hand the text over. Parsing is CPU-bound and synchronous, so
//! interactive callers should build the [`LoadedLog`] off their UI thread;
//! it is `Send`.
//!
//! ```rust
//! use logmate_engine::{Category, LoadedLog, LogSession};
//!
//! let loaded = LoadedLog::from_content("ERROR - disk fault\nplain\nINFO - ok");
//! assert_eq!(loaded.summary.count(Category::Error), 1);
//!
//! let mut session = LogSession::new(loaded);
//! assert_eq!(session.next_in_category(Category::Info), Some(2));
//! assert_eq!(session.category_label(Category::Info), "INFO (1/1)");
//!
//! session.set_query("FAULT");
//! assert_eq!(session.highlighted_line(), Some(0));
//! ```

pub mod category_index;
pub mod line;
pub mod nav_list;
pub mod search;
pub mod session;
pub mod summary;

pub use category_index::CategoryIndex;
pub use line::{Line, parse, split_lines};
pub use nav_list::NavList;
pub use search::{SearchState, highlight_ranges};
pub use session::{LoadedLog, LogSession};
pub use summary::{Summary, build_summary};

// re-export the line-level recognizers so callers need only this crate
pub use logmate_parser::{
    Category, ParseCategoryError, classify, extract_timestamp, format_in, format_local,
};
