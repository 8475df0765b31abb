use logmate_parser::{Category, classify};
use rayon::prelude::*;

// above this many lines classification runs on the rayon pool
const PARALLEL_THRESHOLD: usize = 1000;

// LF, CR, NEL, LINE SEPARATOR, PARAGRAPH SEPARATOR; CR LF counts as one break
const LINE_BREAKS: [char; 5] = ['\n', '\r', '\u{85}', '\u{2028}', '\u{2029}'];

/// one line of the input, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 0-based position in the parsed sequence
    pub index: usize,
    /// original content without its terminator
    pub text: String,
    pub category: Option<Category>,
}

impl Line {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let category = classify(&text);
        Self {
            index,
            text,
            category,
        }
    }
}

/// iterator over the lines of a text blob, see [`split_lines`]
pub struct LineSplit<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for LineSplit<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        match rest.find(LINE_BREAKS) {
            Some(pos) => {
                let tail = &rest[pos..];
                let terminator_len = if tail.starts_with("\r\n") {
                    2
                } else {
                    tail.chars().next().map_or(1, char::len_utf8)
                };
                self.rest = Some(&rest[pos + terminator_len..]);
                Some(&rest[..pos])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

/// split on universal newlines: `\r\n`, `\n`, a lone `\r`, and the Unicode
/// breaks U+0085, U+2028 and U+2029
///
/// unlike [`str::lines`] the segment after the last terminator is always
/// yielded, so the empty string produces one empty line and `"a\n"` produces
/// `["a", ""]`.
pub fn split_lines(content: &str) -> LineSplit<'_> {
    LineSplit {
        rest: Some(content),
    }
}

/// turn raw text into classified lines, one per input line
pub fn parse(content: &str) -> Vec<Line> {
    let raw_lines: Vec<&str> = split_lines(content).collect();

    if raw_lines.len() > PARALLEL_THRESHOLD {
        raw_lines
            .par_iter()
            .enumerate()
            .map(|(index, text)| Line::new(index, *text))
            .collect()
    } else {
        raw_lines
            .iter()
            .enumerate()
            .map(|(index, text)| Line::new(index, *text))
            .collect()
    }
}
