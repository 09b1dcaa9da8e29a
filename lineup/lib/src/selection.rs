//! Click-and-drag multi-line selection.
//!
//! Pressing on a line number anchors a selection at that line; dragging over
//! any part of another line (number cell, content cell, or row) extends the
//! selection between the anchor and that line; releasing or leaving ends the
//! gesture. The anchor lives in a [`SelectionState`] owned by the caller, one
//! per interactive surface, and selected ranges go to a [`TextSelection`].
//!
//! ```text
//!              down on a line number
//!   ┌──────┐ ───────────────────────► ┌──────────────────┐
//!   │ Idle │                          │ Dragging(anchor) │ ◄─┐ move: select [anchor, n]
//!   └──────┘ ◄─────────────────────── └──────────────────┘ ──┘
//!               up / leave
//! ```

use kuchikiki::NodeRef;
use tracing::warn;

use crate::dom;
use crate::error::{LineupError, LineupResult};
use crate::ids::{BlockId, LinePart};

/// The anchor line of an in-progress drag, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    anchor: Option<usize>,
}

impl SelectionState {
    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Pointer input relevant to line selection.
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent<'a> {
    Down(&'a NodeRef),
    Move(&'a NodeRef),
    Up,
    Leave,
}

/// A selection spanning whole lines of one block.
///
/// The range starts before the content of `start` and ends after the content
/// of `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRange {
    pub block: BlockId,
    pub start_line: usize,
    pub end_line: usize,
    pub start: NodeRef,
    pub end: NodeRef,
}

impl LineRange {
    /// Lines covered by the range, inclusive.
    pub fn lines(&self) -> std::ops::RangeInclusive<usize> {
        self.start_line..=self.end_line
    }
}

/// The document's text selection.
pub trait TextSelection {
    fn remove_all_ranges(&mut self);
    fn add_range(&mut self, range: LineRange);
}

/// An in-memory selection holding plain ranges.
#[derive(Debug, Default)]
pub struct DocumentSelection {
    ranges: Vec<LineRange>,
}

impl DocumentSelection {
    pub fn ranges(&self) -> &[LineRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The selected text, one line per selected content node.
    pub fn text(&self, root: &NodeRef) -> String {
        self.ranges
            .iter()
            .flat_map(|range| {
                range
                    .lines()
                    .filter_map(|line| dom::find_by_id(root, &range.block.content(line)))
                    .map(|node| node.text_contents())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TextSelection for DocumentSelection {
    fn remove_all_ranges(&mut self) {
        self.ranges.clear();
    }

    fn add_range(&mut self, range: LineRange) {
        self.ranges.push(range);
    }
}

/// Selects lines `a` through `b` of a block, in either order.
///
/// Both `-LC{n}` nodes must exist; otherwise the existing selection is left
/// untouched and [`LineupError::MissingSelectionNode`] is returned.
pub fn select_lines<S>(root: &NodeRef, block: &BlockId, a: usize, b: usize, selection: &mut S) -> LineupResult<()>
where
    S: TextSelection + ?Sized,
{
    let (start_line, end_line) = if a <= b { (a, b) } else { (b, a) };

    let resolve = |line: usize| {
        let id = block.content(line);
        dom::find_by_id(root, &id).ok_or_else(|| {
            warn!(block = %block, start_line, end_line, missing = %id, "line selection aborted");
            LineupError::MissingSelectionNode { id }
        })
    };
    let start = resolve(start_line)?;
    let end = resolve(end_line)?;

    selection.remove_all_ranges();
    selection.add_range(LineRange {
        block: block.clone(),
        start_line,
        end_line,
        start,
        end,
    });
    Ok(())
}

/// Routes pointer events for one block into line selections.
#[derive(Debug, Clone)]
pub struct SelectionController<'a> {
    root: &'a NodeRef,
    block: BlockId,
}

impl<'a> SelectionController<'a> {
    pub fn new(root: &'a NodeRef, block: BlockId) -> Self {
        Self { root, block }
    }

    /// A controller for the enhanced block element `block`.
    pub fn for_block(root: &'a NodeRef, block: &NodeRef) -> LineupResult<Self> {
        Ok(Self::new(root, BlockId::of(block)?))
    }

    pub fn block(&self) -> &BlockId {
        &self.block
    }

    /// The line (and which part of it) a pointer target belongs to.
    ///
    /// Walks up from `target` to the first element whose id names a line of
    /// this block.
    pub fn resolve_line(&self, target: &NodeRef) -> Option<(LinePart, usize)> {
        target
            .inclusive_ancestors()
            .filter_map(|node| dom::attr(&node, "id"))
            .find_map(|id| self.block.parse_line_id(&id))
    }

    pub fn handle<S>(&self, state: &mut SelectionState, event: PointerEvent<'_>, selection: &mut S) -> LineupResult<()>
    where
        S: TextSelection + ?Sized,
    {
        match event {
            PointerEvent::Down(target) => {
                let Some((LinePart::Number, line)) = self.resolve_line(target) else {
                    return Ok(());
                };
                state.anchor = Some(line);
                select_lines(self.root, &self.block, line, line, selection)
            }
            PointerEvent::Move(target) => {
                let Some(anchor) = state.anchor else {
                    return Ok(());
                };
                match self.resolve_line(target) {
                    Some((_, line)) => select_lines(self.root, &self.block, anchor, line, selection),
                    None => Ok(()),
                }
            }
            PointerEvent::Up | PointerEvent::Leave => {
                state.anchor = None;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhance::Enhancer;
    use crate::options::EnhanceOptions;
    use tracing_test::traced_test;

    fn fixture() -> (NodeRef, BlockId) {
        let doc = dom::parse_document("<pre><code>one\n<span class=\"k\">two</span>\nthree\nfour\nfive\n</code></pre>");
        Enhancer::new(EnhanceOptions::default()).enhance(&doc).unwrap();
        (doc, BlockId::new("codeblock", 0))
    }

    fn node(doc: &NodeRef, id: &str) -> NodeRef {
        dom::find_by_id(doc, id).unwrap()
    }

    fn selected(selection: &DocumentSelection) -> Vec<(usize, usize)> {
        selection
            .ranges()
            .iter()
            .map(|range| (range.start_line, range.end_line))
            .collect()
    }

    #[test]
    fn select_lines_normalizes_direction() {
        let (doc, block) = fixture();
        let mut forward = DocumentSelection::default();
        let mut backward = DocumentSelection::default();

        select_lines(&doc, &block, 2, 5, &mut forward).unwrap();
        select_lines(&doc, &block, 5, 2, &mut backward).unwrap();

        assert_eq!(forward.ranges(), backward.ranges());
        assert_eq!(selected(&forward), vec![(2, 5)]);
        assert_eq!(forward.text(&doc), "two\nthree\nfour\nfive");
    }

    #[test]
    fn selecting_replaces_previous_ranges() {
        let (doc, block) = fixture();
        let mut selection = DocumentSelection::default();

        select_lines(&doc, &block, 1, 1, &mut selection).unwrap();
        select_lines(&doc, &block, 3, 4, &mut selection).unwrap();

        assert_eq!(selected(&selection), vec![(3, 4)]);
    }

    #[test]
    #[traced_test]
    fn missing_line_aborts_without_touching_selection() {
        let (doc, block) = fixture();
        let mut selection = DocumentSelection::default();
        select_lines(&doc, &block, 1, 2, &mut selection).unwrap();

        let result = select_lines(&doc, &block, 4, 9, &mut selection);

        assert!(matches!(
            result,
            Err(LineupError::MissingSelectionNode { ref id }) if id == "codeblock-0-LC9"
        ));
        assert_eq!(selected(&selection), vec![(1, 2)]);
        assert!(logs_contain("line selection aborted"));
    }

    #[test]
    fn drag_from_number_cell_extends_over_content() {
        let (doc, block) = fixture();
        let controller = SelectionController::new(&doc, block.clone());
        let mut state = SelectionState::default();
        let mut selection = DocumentSelection::default();

        controller
            .handle(&mut state, PointerEvent::Down(&node(&doc, "codeblock-0-L4")), &mut selection)
            .unwrap();
        assert_eq!(state.anchor(), Some(4));
        assert_eq!(selected(&selection), vec![(4, 4)]);

        // the keyword span inside line 2 resolves through its content cell
        let keyword = node(&doc, "codeblock-0-LC2").first_child().unwrap();
        controller
            .handle(&mut state, PointerEvent::Move(&keyword), &mut selection)
            .unwrap();
        assert_eq!(selected(&selection), vec![(2, 4)]);

        controller
            .handle(&mut state, PointerEvent::Move(&node(&doc, "codeblock-0-LR5")), &mut selection)
            .unwrap();
        assert_eq!(selected(&selection), vec![(4, 5)]);

        controller.handle(&mut state, PointerEvent::Up, &mut selection).unwrap();
        assert!(!state.is_dragging());
        assert_eq!(selected(&selection), vec![(4, 5)]);
    }

    #[test]
    fn stale_events_are_no_ops() {
        let (doc, block) = fixture();
        let controller = SelectionController::new(&doc, block.clone());
        let mut state = SelectionState::default();
        let mut selection = DocumentSelection::default();

        controller
            .handle(&mut state, PointerEvent::Move(&node(&doc, "codeblock-0-LC3")), &mut selection)
            .unwrap();
        controller.handle(&mut state, PointerEvent::Up, &mut selection).unwrap();
        controller.handle(&mut state, PointerEvent::Leave, &mut selection).unwrap();

        assert!(selection.is_empty());
        assert_eq!(state, SelectionState::default());
    }

    #[test]
    fn leaving_mid_drag_ends_the_drag() {
        let (doc, block) = fixture();
        let controller = SelectionController::new(&doc, block.clone());
        let mut state = SelectionState::default();
        let mut selection = DocumentSelection::default();

        controller
            .handle(&mut state, PointerEvent::Down(&node(&doc, "codeblock-0-L2")), &mut selection)
            .unwrap();
        controller
            .handle(&mut state, PointerEvent::Move(&node(&doc, "codeblock-0-LC3")), &mut selection)
            .unwrap();
        assert!(state.is_dragging());

        controller.handle(&mut state, PointerEvent::Leave, &mut selection).unwrap();
        assert!(!state.is_dragging());

        controller
            .handle(&mut state, PointerEvent::Move(&node(&doc, "codeblock-0-LC5")), &mut selection)
            .unwrap();
        assert_eq!(selected(&selection), vec![(2, 3)]);
    }

    #[test]
    fn pressing_outside_line_numbers_does_not_anchor() {
        let (doc, block) = fixture();
        let controller = SelectionController::new(&doc, block.clone());
        let mut state = SelectionState::default();
        let mut selection = DocumentSelection::default();

        controller
            .handle(&mut state, PointerEvent::Down(&node(&doc, "codeblock-0-LC1")), &mut selection)
            .unwrap();
        controller.handle(&mut state, PointerEvent::Down(&doc), &mut selection).unwrap();

        assert!(!state.is_dragging());
        assert!(selection.is_empty());
    }

    #[test]
    fn moves_over_unrelated_nodes_are_ignored() {
        let (doc, block) = fixture();
        let controller = SelectionController::new(&doc, block.clone());
        let mut state = SelectionState::default();
        let mut selection = DocumentSelection::default();

        controller
            .handle(&mut state, PointerEvent::Down(&node(&doc, "codeblock-0-L1")), &mut selection)
            .unwrap();
        controller
            .handle(&mut state, PointerEvent::Move(&node(&doc, "codeblock-0")), &mut selection)
            .unwrap();

        assert_eq!(selected(&selection), vec![(1, 1)]);
        assert!(state.is_dragging());
    }

    #[test]
    fn controller_reads_id_from_block_element() {
        let (doc, _) = fixture();
        let block = node(&doc, "codeblock-0");
        let controller = SelectionController::for_block(&doc, &block).unwrap();
        assert_eq!(controller.block().as_str(), "codeblock-0");

        let row = node(&doc, "codeblock-0-LR1");
        assert!(matches!(
            SelectionController::for_block(&doc, &row),
            Err(LineupError::MissingBlockId)
        ));
    }
}
