//! # logmate-parser
//!
//! Line-level recognizers for plain-text syslog files.
//!
//! Both recognizers are total: a line that carries no severity tag or no
//! timestamp yields `None`, never an error.
//!
//! - [`classify`] finds the severity [`Category`] of a line, e.g. `ERROR - disk fault`.
//! - [`extract_timestamp`] finds an embedded `yyyy/MM/dd-HH:mm:ss[.SSS]` instant.
//!
//! ```rust
//! use logmate_parser::{Category, classify, extract_timestamp};
//!
//! let line = "2024/01/02-03:04:05.006 ERROR - disk fault";
//! assert_eq!(classify(line), Some(Category::Error));
//! assert!(extract_timestamp(line).is_some());
//! ```

mod category;
mod timestamp;

pub use category::{Category, ParseCategoryError, classify};
pub use timestamp::{extract_timestamp, format_in, format_local};
