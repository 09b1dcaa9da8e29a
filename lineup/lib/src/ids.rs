//! Stable DOM identifiers for enhanced blocks and their lines.

use std::fmt;

use kuchikiki::NodeRef;
use lazy_static::lazy_static;
use regex::Regex;

use crate::classes;
use crate::dom;
use crate::error::{LineupError, LineupResult};

lazy_static! {
    /// Matches `{block}-L{n}`, `{block}-LC{n}` and `{block}-LR{n}`.
    static ref LINE_ID_PATTERN: Regex = Regex::new(r"^(.+)-L(C|R)?(\d+)$").unwrap();
}

/// Which part of a line an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePart {
    /// The line-number cell (`-L{n}`).
    Number,
    /// The content cell or its console text wrapper (`-LC{n}`).
    Content,
    /// The whole row (`-LR{n}`).
    Row,
}

/// The id of one enhanced block, `{prefix}-{N}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(prefix: &str, ordinal: usize) -> Self {
        Self(format!("{prefix}-{ordinal}"))
    }

    /// Wraps an id read back from the document.
    pub fn from_existing(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Reads the id of an enhanced block root element.
    pub fn of(block: &NodeRef) -> LineupResult<Self> {
        if !dom::has_class(block, classes::BLOCK) {
            return Err(LineupError::MissingBlockId);
        }
        dom::attr(block, "id")
            .filter(|id| !id.is_empty())
            .map(Self)
            .ok_or(LineupError::MissingBlockId)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn line_number(&self, line: usize) -> String {
        format!("{}-L{line}", self.0)
    }

    pub fn content(&self, line: usize) -> String {
        format!("{}-LC{line}", self.0)
    }

    pub fn row(&self, line: usize) -> String {
        format!("{}-LR{line}", self.0)
    }

    /// Extracts the line number from an id belonging to this block.
    ///
    /// ```
    /// use lineup_lib::ids::{BlockId, LinePart};
    ///
    /// let block = BlockId::new("codeblock", 3);
    /// assert_eq!(block.parse_line_id("codeblock-3-LC12"), Some((LinePart::Content, 12)));
    /// assert_eq!(block.parse_line_id("codeblock-4-LC12"), None);
    /// ```
    pub fn parse_line_id(&self, id: &str) -> Option<(LinePart, usize)> {
        let captures = LINE_ID_PATTERN.captures(id)?;
        if captures.get(1)?.as_str() != self.0 {
            return None;
        }
        let part = match captures.get(2).map(|m| m.as_str()) {
            None => LinePart::Number,
            Some("C") => LinePart::Content,
            Some(_) => LinePart::Row,
        };
        let line = captures.get(3)?.as_str().parse().ok()?;
        Some((part, line))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
