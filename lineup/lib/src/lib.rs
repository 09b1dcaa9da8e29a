//! Interactive code-block enhancement for rendered HTML.
//!
//! Static site generators emit syntax-highlighted code as a `pre` (possibly
//! inside a wrapper `div`) full of token spans. This library re-renders those
//! blocks as line tables with stable per-line ids, optional titles with
//! permalink anchors, highlighted lines from a compact range syntax, drag
//! selection of whole lines, and a copy action that knows to leave shell
//! prompts and program output behind.
//!
//! ## Modules
//!
//! - [`ranges`] - Highlight range parsing (`"1,4-6"`)
//! - [`extract`] - Source shapes and line-accurate content extraction
//! - [`render`] - Per-line row rendering, including console prompts
//! - [`block`] - Block configuration and enhanced block markup
//! - [`enhance`] - The document-level enhancement pass
//! - [`selection`] - Click-and-drag line selection
//! - [`copy`] / [`clipboard`] - Copy-to-clipboard and clipboard sinks
//! - [`anchors`] - Title slugs and permalink anchors
//!
//! ## Examples
//!
//! ```
//! use lineup_lib::{EnhanceOptions, Enhancer, dom};
//!
//! let document = dom::parse_document(
//!     r#"<pre data-title="Greeting" data-highlight="2"><code class="language-sh">echo hi
//! echo there
//! </code></pre>"#,
//! );
//!
//! let mut enhancer = Enhancer::new(EnhanceOptions::default());
//! let report = enhancer.enhance(&document).unwrap();
//!
//! assert_eq!(report.enhanced, vec!["codeblock-0".to_string()]);
//! assert!(dom::find_by_id(&document, "codeblock-0-LC2").is_some());
//! assert!(dom::find_by_id(&document, "greeting-0").is_some());
//! ```

pub mod anchors;
pub mod block;
pub mod classes;
pub mod clipboard;
pub mod copy;
pub mod dom;
pub mod enhance;
pub mod error;
pub mod extract;
pub mod ids;
pub mod options;
pub mod ranges;
pub mod render;
pub mod selection;

pub use kuchikiki::NodeRef;

pub use anchors::{AnchorGenerator, DefaultSlugger, PermalinkAnchors, Slugger};
pub use clipboard::{Clipboard, MemoryClipboard, Osc52Clipboard};
pub use copy::{CopyController, CopyKind, LineExtractor, ScheduledRevert, copy_text};
pub use enhance::{EnhanceReport, Enhancer, SkippedBlock, enhance_html};
pub use error::{LineupError, LineupResult};
pub use ids::BlockId;
pub use options::{ColorMode, EnhanceOptions, Markers, Variant};
pub use ranges::{HighlightSet, parse_ranges};
pub use selection::{
    DocumentSelection, PointerEvent, SelectionController, SelectionState, TextSelection, select_lines,
};
