//! Class names that make up the produced DOM contract.
//!
//! Stylesheets and the interactive controllers both key off these, so they
//! live in one place.

/// Marker added to every block the pass has handled (enhanced or retained).
pub const PROCESSED: &str = "code-block-processed";

pub const BLOCK: &str = "code-block";
pub const NO_LINE_NUMBERS: &str = "code-block--no-line-numbers";
pub const HEADER: &str = "code-block-header";
pub const TITLE: &str = "code-block-title";
pub const TABLE: &str = "code-block-table";
pub const ROWS: &str = "code-block-rows";
pub const COPY_BUTTON: &str = "code-block-copy";
pub const ANCHOR: &str = "code-block-anchor";

pub const ROW: &str = "code-row";
pub const ROW_HIGHLIGHTED: &str = "code-row-highlighted";
pub const LINE_NUMBER: &str = "code-line-number";
pub const LINE_CONTENT: &str = "code-line-content";
pub const LINE_HIGHLIGHTED: &str = "code-line-highlighted";

/// Console prompt group, excluded from selection by the stylesheet.
pub const LINE_PROMPT: &str = "code-line-prompt";
/// Console text wrapper that carries the `-LC{n}` id when a prompt is present.
pub const LINE_TEXT: &str = "code-line-text";

pub const ICON_COPY: &str = "icon-copy";
pub const ICON_COPIED: &str = "icon-check";

/// Classes that mark third-party diagram blocks which must be left alone.
pub const DIAGRAM_MARKERS: [&str; 2] = ["mermaid", "language-mermaid"];
