//! Line-accurate content extraction from highlighted code containers.
//!
//! Syntax highlighters emit one inline element per token, and a single token
//! (a multi-line string literal, a block comment) may span several lines.
//! Splitting the serialized HTML on newlines would leave unbalanced tags, so
//! extraction splits *before* serialization: every direct child of the code
//! element is cut at its newlines and each piece becomes a self-contained
//! [`Segment`]. The result is an explicit line model that the renderer
//! serializes independently of any particular DOM.
//!
//! Two container shapes are recognized:
//!
//! ```text
//! Wrapped:  <div class="language-rust highlighter-rouge">
//!             <div class="highlight"><pre class="highlight"><code>…</code></pre></div>
//!           </div>
//!
//! Bare:     <pre><code class="language-rust">…</code></pre>
//!           <pre>…</pre>
//! ```

use kuchikiki::NodeRef;

use crate::dom;
use crate::error::{LineupError, LineupResult};
use crate::ranges::HighlightSet;

/// Class that identifies the wrapped container shape.
pub const WRAPPED_CLASS: &str = "highlighter-rouge";

/// Trailing line left behind when a token closes right after a line break.
const CLOSING_SPAN_ARTIFACT: &str = "</span>";

/// The two recognized source container shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceShape {
    /// `wrapper > highlight container > pre > code`.
    Wrapped,
    /// A `pre`, optionally wrapping a single `code` element.
    Bare,
}

impl SourceShape {
    /// Resolves the shape of a candidate container.
    pub fn detect(node: &NodeRef) -> Option<Self> {
        if dom::has_class(node, WRAPPED_CLASS) {
            Some(Self::Wrapped)
        } else if dom::is_tag(node, "pre") {
            Some(Self::Bare)
        } else {
            None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Wrapped => "wrapped",
            Self::Bare => "bare",
        }
    }
}

/// A pre-existing code container in one of the recognized shapes.
#[derive(Debug, Clone)]
pub struct CodeBlockSource {
    container: NodeRef,
    shape: SourceShape,
}

impl CodeBlockSource {
    /// Wraps `container` if it has a recognized shape.
    pub fn new(container: NodeRef) -> Option<Self> {
        let shape = SourceShape::detect(&container)?;
        Some(Self { container, shape })
    }

    pub fn container(&self) -> &NodeRef {
        &self.container
    }

    pub fn shape(&self) -> SourceShape {
        self.shape
    }

    /// Reads an attribute from the source container.
    pub fn attr(&self, name: &str) -> Option<String> {
        dom::attr(&self.container, name)
    }

    /// Locates the element whose children are the highlighted tokens.
    pub fn code_element(&self) -> LineupResult<NodeRef> {
        match self.shape {
            SourceShape::Wrapped => {
                let mismatch = |expected| LineupError::StructuralMismatch {
                    shape: self.shape.name(),
                    expected,
                };
                let highlight =
                    dom::first_element_child(&self.container).ok_or(mismatch("highlight container"))?;
                let pre = dom::first_element_child(&highlight)
                    .filter(|node| dom::is_tag(node, "pre"))
                    .ok_or(mismatch("pre"))?;
                dom::first_element_child(&pre)
                    .filter(|node| dom::is_tag(node, "code"))
                    .ok_or(mismatch("code"))
            }
            SourceShape::Bare => {
                let mut children = self.container.children();
                match (children.next(), children.next()) {
                    (Some(only), None) if dom::is_tag(&only, "code") => Ok(only),
                    _ => Ok(self.container.clone()),
                }
            }
        }
    }

    /// The block language from its `language-<id>` class.
    pub fn language(&self) -> Option<String> {
        match self.shape {
            SourceShape::Wrapped => dom::language_class(&self.container),
            SourceShape::Bare => self
                .code_element()
                .ok()
                .and_then(|code| dom::language_class(&code))
                .or_else(|| dom::language_class(&self.container)),
        }
    }

    /// Extracts the block's lines.
    pub fn lines(&self) -> LineupResult<Vec<LineRecord>> {
        let code = self.code_element()?;
        let lines = split_lines(&code);
        if lines.is_empty() {
            return Err(LineupError::EmptyContent);
        }
        Ok(lines)
    }
}

/// One self-contained piece of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain (unescaped) text.
    Text(String),
    /// A shallow copy of an inline element holding one line's worth of its text.
    Inline {
        tag: String,
        attributes: Vec<(String, String)>,
        text: String,
    },
    /// The text of one line of a comment, re-wrapped as its own comment.
    Comment(String),
    /// Already serialized markup carried verbatim.
    Markup(String),
}

impl Segment {
    pub fn to_html(&self) -> String {
        match self {
            Self::Text(text) => html_escape::encode_text(text).into_owned(),
            Self::Inline {
                tag,
                attributes,
                text,
            } => {
                let mut html = format!("<{tag}");
                for (name, value) in attributes {
                    html.push_str(&format!(
                        r#" {name}="{}""#,
                        html_escape::encode_double_quoted_attribute(value)
                    ));
                }
                html.push('>');
                html.push_str(&html_escape::encode_text(text));
                html.push_str(&format!("</{tag}>"));
                html
            }
            Self::Comment(text) => format!("<!--{text}-->"),
            Self::Markup(markup) => markup.clone(),
        }
    }

    /// Whether this is an inline element carrying `class`.
    pub fn has_class(&self, class: &str) -> bool {
        match self {
            Self::Inline { attributes, .. } => attributes
                .iter()
                .any(|(name, value)| name == "class" && value.split_whitespace().any(|c| c == class)),
            _ => false,
        }
    }

    pub fn is_whitespace_text(&self) -> bool {
        matches!(self, Self::Text(text) if text.chars().all(char::is_whitespace))
    }
}

/// One logical source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// 1-based line number.
    pub number: usize,
    pub segments: Vec<Segment>,
    pub highlighted: bool,
}

impl LineRecord {
    /// The line's self-contained inner HTML.
    pub fn html(&self) -> String {
        segments_html(&self.segments)
    }
}

pub(crate) fn segments_html(segments: &[Segment]) -> String {
    segments.iter().map(Segment::to_html).collect()
}

/// Marks the lines contained in `highlights`.
pub fn apply_highlights(lines: &mut [LineRecord], highlights: &HighlightSet) {
    for line in lines {
        line.highlighted = highlights.contains(line.number);
    }
}

enum Piece {
    Segment(Segment),
    Break,
}

/// Splits the children of a code element into per-line segments.
///
/// A trailing empty line (the usual final newline) or a trailing lone
/// `</span>` is dropped.
pub fn split_lines(code: &NodeRef) -> Vec<LineRecord> {
    let mut pieces = Vec::new();

    for child in code.children() {
        if child.as_element().is_some() {
            let tag = dom::tag_name(&child).unwrap_or_else(|| "span".to_string());
            let attributes = dom::attributes(&child);
            push_split(&mut pieces, &child.text_contents(), |text| Segment::Inline {
                tag: tag.clone(),
                attributes: attributes.clone(),
                text,
            });
        } else if let Some(text) = child.as_text() {
            push_split(&mut pieces, &text.borrow(), Segment::Text);
        } else if let Some(comment) = child.as_comment() {
            push_split(&mut pieces, &comment.borrow(), Segment::Comment);
        } else {
            let markup = dom::outer_html(&child);
            if markup.contains('\n') {
                push_split(&mut pieces, &child.text_contents(), Segment::Text);
            } else {
                pieces.push(Piece::Segment(Segment::Markup(markup)));
            }
        }
    }

    let mut grouped: Vec<Vec<Segment>> = vec![Vec::new()];
    for piece in pieces {
        match piece {
            Piece::Segment(segment) => {
                if let Some(current) = grouped.last_mut() {
                    current.push(segment);
                }
            }
            Piece::Break => grouped.push(Vec::new()),
        }
    }

    drop_trailing_artifact(&mut grouped);

    grouped
        .into_iter()
        .enumerate()
        .map(|(index, segments)| LineRecord {
            number: index + 1,
            segments,
            highlighted: false,
        })
        .collect()
}

fn drop_trailing_artifact(lines: &mut Vec<Vec<Segment>>) {
    if let Some(last) = lines.last() {
        let html = segments_html(last);
        if html.is_empty() || html == CLOSING_SPAN_ARTIFACT {
            lines.pop();
        }
    }
}

fn push_split(pieces: &mut Vec<Piece>, content: &str, make: impl Fn(String) -> Segment) {
    let parts: Vec<&str> = content.split('\n').collect();
    let last = parts.len().saturating_sub(1);
    for (index, part) in parts.into_iter().enumerate() {
        if !part.is_empty() {
            pieces.push(Piece::Segment(make(part.to_string())));
        }
        if index < last {
            pieces.push(Piece::Break);
        }
    }
}
