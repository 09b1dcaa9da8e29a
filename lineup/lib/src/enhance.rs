//! The document-level enhancement pass.
//!
//! [`Enhancer::enhance`] walks a document twice: first over wrapped
//! containers, then over bare `pre` elements, so ids follow that order. Each
//! candidate is skipped when it (or an ancestor) already carries the
//! processed marker, retained as-is when it is a legacy or diagram block, and
//! otherwise replaced in place by its enhanced rendering. Blocks that cannot
//! be extracted are logged, recorded in the [`EnhanceReport`], and left alone.
//!
//! ## Examples
//!
//! ```
//! use lineup_lib::{EnhanceOptions, enhance_html};
//!
//! let (html, report) = enhance_html("<pre>a\nb</pre>", &EnhanceOptions::default()).unwrap();
//!
//! assert_eq!(report.enhanced, vec!["codeblock-0".to_string()]);
//! assert!(html.contains(r#"id="codeblock-0-LC2""#));
//! ```

use kuchikiki::NodeRef;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::anchors::{AnchorGenerator, DefaultSlugger, PermalinkAnchors, Slugger};
use crate::block::{BlockConfig, BlockLayout};
use crate::classes;
use crate::dom;
use crate::error::LineupResult;
use crate::extract::{CodeBlockSource, WRAPPED_CLASS, apply_highlights};
use crate::ids::BlockId;
use crate::options::{EnhanceOptions, Variant};
use crate::ranges::parse_ranges;

/// Selector handed to the anchor generator after each pass.
pub const TITLE_SELECTOR: &str = ".code-block-title[id]";

/// A block the pass could not enhance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedBlock {
    /// Source shape, `wrapped` or `bare`.
    pub shape: &'static str,
    pub reason: String,
}

/// Outcome of one enhancement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnhanceReport {
    /// Ids of the blocks enhanced by this pass, in assignment order.
    pub enhanced: Vec<String>,
    /// Legacy and diagram blocks that were only marked as processed.
    pub retained: usize,
    pub skipped: Vec<SkippedBlock>,
}

impl EnhanceReport {
    /// Whether the pass changed nothing.
    pub fn is_empty(&self) -> bool {
        self.enhanced.is_empty() && self.retained == 0
    }
}

/// Runs enhancement passes over documents.
///
/// Block ids come from a counter that lives as long as the enhancer, so
/// repeated passes (for content added later to the same page) never reuse
/// an id.
pub struct Enhancer {
    options: EnhanceOptions,
    next_id: usize,
    slugger: Box<dyn Slugger>,
    anchors: Box<dyn AnchorGenerator>,
}

impl Enhancer {
    pub fn new(options: EnhanceOptions) -> Self {
        Self {
            options,
            next_id: 0,
            slugger: Box::new(DefaultSlugger),
            anchors: Box::new(PermalinkAnchors),
        }
    }

    pub fn with_slugger(mut self, slugger: impl Slugger + 'static) -> Self {
        self.slugger = Box::new(slugger);
        self
    }

    pub fn with_anchors(mut self, anchors: impl AnchorGenerator + 'static) -> Self {
        self.anchors = Box::new(anchors);
        self
    }

    pub fn options(&self) -> &EnhanceOptions {
        &self.options
    }

    /// Enhances every unprocessed code block below `root`.
    ///
    /// Per-block failures are reported, not returned. Errors come only from
    /// the anchor generator.
    #[instrument(skip_all)]
    pub fn enhance(&mut self, root: &NodeRef) -> LineupResult<EnhanceReport> {
        let mut report = EnhanceReport::default();

        for selector in [format!("div.{WRAPPED_CLASS}"), "pre".to_string()] {
            for candidate in dom::select_all(root, &selector)? {
                self.process(root, candidate, &mut report);
            }
        }

        self.anchors.generate(root, TITLE_SELECTOR)?;

        info!(
            enhanced = report.enhanced.len(),
            retained = report.retained,
            skipped = report.skipped.len(),
            "code block pass complete"
        );
        Ok(report)
    }

    fn process(&mut self, root: &NodeRef, container: NodeRef, report: &mut EnhanceReport) {
        // an earlier replacement in this pass may have taken the candidate with it
        if !container.inclusive_ancestors().any(|node| node == *root) {
            return;
        }
        if dom::within_class(&container, classes::PROCESSED) {
            return;
        }
        let Some(source) = CodeBlockSource::new(container.clone()) else {
            return;
        };
        let shape = source.shape().name();

        let config = BlockConfig::read(&source, self.options.default_variant);
        if config.variant == Variant::Legacy || contains_diagram(&container) {
            dom::add_class(&container, classes::PROCESSED);
            report.retained += 1;
            debug!(shape, variant = %config.variant, "retained code block as rendered");
            return;
        }

        let mut lines = match source.lines() {
            Ok(lines) => lines,
            Err(error) => {
                warn!(shape, %error, "skipping code block");
                report.skipped.push(SkippedBlock {
                    shape,
                    reason: error.to_string(),
                });
                return;
            }
        };
        let highlights = parse_ranges(config.highlight.as_deref(), lines.len());
        apply_highlights(&mut lines, &highlights);

        let ordinal = self.next_id;
        self.next_id += 1;
        let id = BlockId::new(&self.options.id_prefix, ordinal);

        let layout = BlockLayout {
            id: &id,
            ordinal,
            config: &config,
            options: &self.options,
            slugger: self.slugger.as_ref(),
        };
        dom::replace_with(&container, dom::parse_fragment_nodes(&layout.render(&lines)));

        debug!(
            id = %id,
            shape,
            language = config.language_or_fallback(),
            lines = lines.len(),
            highlighted = highlights.len(),
            "enhanced code block"
        );
        report.enhanced.push(id.to_string());
    }
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::new(EnhanceOptions::default())
    }
}

/// Third-party diagram blocks are rendered client-side by their own library.
fn contains_diagram(container: &NodeRef) -> bool {
    container
        .inclusive_descendants()
        .any(|node| classes::DIAGRAM_MARKERS.iter().any(|class| dom::has_class(&node, class)))
}

/// Parses `html`, runs one pass with `options`, and serializes the result.
pub fn enhance_html(html: &str, options: &EnhanceOptions) -> LineupResult<(String, EnhanceReport)> {
    let document = dom::parse_document(html);
    let report = Enhancer::new(options.clone()).enhance(&document)?;
    Ok((dom::outer_html(&document), report))
}
