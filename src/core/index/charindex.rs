//! Inverted index from Unicode character-name words to characters.
//!
//! The index is built once from a name table in `UnicodeData.txt` layout
//! (`CODE;NAME;...`, one character per line). Every word of a character's
//! name maps to the set of characters carrying that word, so a query like
//! `cat face` is the intersection of the sets for `CAT` and `FACE`.
//!
//! The bundled table carries every character named in Unicode 14.0, so
//! the default index covers the whole code space.

use crate::core::config::IndexConfig;
use crate::core::error::{FinderError, Result};
use crate::core::index::names::DerivedRange;
use crate::core::index::Index;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

static BUNDLED_NAMES: &str = include_str!("../../../data/char_names.txt");

/// Split text into uppercase words
///
/// ```
/// use mojifinder::core::index::tokenize;
///
/// let words: Vec<String> = tokenize("hyphen-minus sign").collect();
/// assert_eq!(words, ["HYPHEN", "MINUS", "SIGN"]);
/// ```
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_uppercase())
}

/// Character-name inverted index
#[derive(Debug, Default)]
pub struct CharIndex {
    entries: HashMap<String, BTreeSet<char>>,
    names: HashMap<char, String>,
}

impl CharIndex {
    /// Build from the name table compiled into the binary
    pub fn bundled(range: RangeInclusive<u32>) -> Result<Self> {
        Self::from_names(BUNDLED_NAMES, range)
    }

    /// Build from a name table file on disk
    pub fn from_file(path: impl AsRef<Path>, range: RangeInclusive<u32>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            FinderError::ConfigError(format!("Failed to read name table {path:?}: {e}"))
        })?;
        Self::from_names(&contents, range)
    }

    /// Build the index described by the `[index]` configuration
    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        let range = config.first_code_point..=config.last_code_point;
        match &config.data_file {
            Some(path) => Self::from_file(path, range),
            None => Self::bundled(range),
        }
    }

    /// Build from name table text
    ///
    /// Blank lines and `#` comments are skipped, as are code points outside
    /// `range`. Names in angle brackets are skipped too, except for
    /// `<Label, First>` / `<Label, Last>` pairs, which expand to every
    /// character of a block with derived names (CJK and Tangut ideographs,
    /// Hangul syllables). A malformed line is an error naming its line
    /// number.
    pub fn from_names(text: &str, range: RangeInclusive<u32>) -> Result<Self> {
        let mut index = Self::default();
        let mut open_range: Option<(&str, u32)> = None;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line_no = line_no + 1;
            let mut fields = line.split(';');
            let code = fields.next().unwrap_or_default().trim();
            let name = fields
                .next()
                .ok_or_else(|| FinderError::IndexData {
                    line: line_no,
                    message: "missing name field".to_string(),
                })?
                .trim();

            let code_point = u32::from_str_radix(code, 16).map_err(|e| FinderError::IndexData {
                line: line_no,
                message: format!("invalid code point '{code}': {e}"),
            })?;

            if let Some(label) = range_marker(name, "First") {
                open_range = Some((label, code_point));
                continue;
            }
            if let Some(label) = range_marker(name, "Last") {
                match open_range.take() {
                    Some((first_label, first)) if first_label == label && first <= code_point => {
                        index.insert_derived(label, first..=code_point, &range);
                    }
                    _ => {
                        return Err(FinderError::IndexData {
                            line: line_no,
                            message: format!("range end '{label}' without a matching start"),
                        })
                    }
                }
                continue;
            }

            if name.is_empty() || name.starts_with('<') || !range.contains(&code_point) {
                continue;
            }

            let ch = char::from_u32(code_point).ok_or_else(|| FinderError::IndexData {
                line: line_no,
                message: format!("U+{code_point:04X} is not a Unicode scalar value"),
            })?;

            index.insert(ch, name);
        }

        Ok(index)
    }

    /// Add the part of a First/Last block that lies inside `range`
    fn insert_derived(
        &mut self,
        label: &str,
        block: RangeInclusive<u32>,
        range: &RangeInclusive<u32>,
    ) {
        let Some(kind) = DerivedRange::from_label(label) else {
            return;
        };

        let start = (*block.start()).max(*range.start());
        let end = (*block.end()).min(*range.end());
        for code_point in start..=end {
            let (Some(ch), Some(name)) = (char::from_u32(code_point), kind.name(code_point))
            else {
                continue;
            };
            self.insert(ch, &name);
        }
    }

    fn insert(&mut self, ch: char, name: &str) {
        for word in tokenize(name) {
            self.entries.entry(word).or_default().insert(ch);
        }
        self.names.insert(ch, name.to_string());
    }

    /// Name of an indexed character
    pub fn name(&self, ch: char) -> Option<&str> {
        self.names.get(&ch).map(String::as_str)
    }

    /// Number of named characters
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Number of distinct name words
    pub fn word_count(&self) -> usize {
        self.entries.len()
    }
}

/// Label of a `<Label, First>` or `<Label, Last>` name
fn range_marker<'a>(name: &'a str, end: &str) -> Option<&'a str> {
    name.strip_prefix('<')?
        .strip_suffix('>')?
        .strip_suffix(end)?
        .strip_suffix(", ")
}

impl Index for CharIndex {
    type Entry = char;

    /// Characters whose names contain every word of the query, in code point order
    fn search(&self, query: &str) -> Vec<char> {
        let words: Vec<String> = tokenize(query).collect();
        let Some((first, rest)) = words.split_first() else {
            return Vec::new();
        };

        let Some(found) = self.entries.get(first) else {
            return Vec::new();
        };

        let mut found = found.clone();
        for word in rest {
            match self.entries.get(word) {
                Some(chars) => found.retain(|ch| chars.contains(ch)),
                None => return Vec::new(),
            }
        }

        found.into_iter().collect()
    }

    fn format(&self, entries: &[char]) -> Vec<String> {
        entries
            .iter()
            .map(|&ch| {
                let name = self.name(ch).unwrap_or_default();
                format!("U+{:04X}\t{ch}\t{name}", ch as u32)
            })
            .collect()
    }
}
