//! Per-line row rendering.
//!
//! Each [`LineRecord`] becomes one table row: an optional line-number cell
//! (the number is shown by the stylesheet from `data-line-number`, which
//! keeps it out of copied text) and a content cell holding the line's HTML.
//!
//! Console blocks get one extra step. When a line starts with a prompt
//! token, the prompt is moved into its own selection-excluded wrapper and the
//! `-LC{n}` id moves from the cell to a wrapper around the remaining text.
//! Selecting or copying a line therefore never picks up the `$ `.

use crate::classes;
use crate::extract::{LineRecord, Segment, segments_html};
use crate::ids::BlockId;
use crate::options::Markers;

/// Block-level context shared by every row of one block.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub block_id: &'a BlockId,
    pub show_line_numbers: bool,
    /// Marker classes, present only when the block language is the console id.
    pub console: Option<&'a Markers>,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    pub number: usize,
    /// Whether the console prompt was split out of the content cell.
    pub has_prompt: bool,
    pub html: String,
}

pub fn render_row(line: &LineRecord, context: &RowContext<'_>) -> RenderedRow {
    let block = context.block_id;
    let number = line.number;

    let mut row_class = classes::ROW.to_string();
    let mut content_class = classes::LINE_CONTENT.to_string();
    if line.highlighted {
        row_class.push(' ');
        row_class.push_str(classes::ROW_HIGHLIGHTED);
        content_class.push(' ');
        content_class.push_str(classes::LINE_HIGHLIGHTED);
    }

    let mut html = format!(r#"<tr id="{}" class="{row_class}">"#, id_attr(&block.row(number)));

    if context.show_line_numbers {
        html.push_str(&format!(
            r#"<td id="{}" class="{}" data-line-number="{number}"></td>"#,
            id_attr(&block.line_number(number)),
            classes::LINE_NUMBER,
        ));
    }

    let prompt = context
        .console
        .and_then(|markers| split_prompt(&line.segments, markers));

    match prompt {
        Some((prompt, tail)) => {
            html.push_str(&format!(
                r#"<td class="{content_class}"><span class="{}" aria-hidden="true">{}</span><span id="{}" class="{}">{}</span></td>"#,
                classes::LINE_PROMPT,
                segments_html(prompt),
                id_attr(&block.content(number)),
                classes::LINE_TEXT,
                segments_html(tail),
            ));
        }
        None => {
            html.push_str(&format!(
                r#"<td id="{}" class="{content_class}">{}</td>"#,
                id_attr(&block.content(number)),
                line.html(),
            ));
        }
    }

    html.push_str("</tr>");

    RenderedRow {
        number,
        has_prompt: prompt.is_some(),
        html,
    }
}

fn id_attr(id: &str) -> String {
    html_escape::encode_double_quoted_attribute(id).into_owned()
}

/// Splits a console line into its leading prompt group and the rest.
///
/// Only lines whose first segment is a prompt token are split. The group
/// then extends over any further prompt tokens, whitespace tokens, and
/// whitespace-only text.
fn split_prompt<'s>(segments: &'s [Segment], markers: &Markers) -> Option<(&'s [Segment], &'s [Segment])> {
    let first = segments.first()?;
    if !first.has_class(&markers.prompt) {
        return None;
    }

    let split = segments
        .iter()
        .position(|segment| {
            !(segment.has_class(&markers.prompt)
                || segment.has_class(&markers.whitespace)
                || segment.is_whitespace_text())
        })
        .unwrap_or(segments.len());

    Some(segments.split_at(split))
}
