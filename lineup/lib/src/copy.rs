//! Copy-to-clipboard for enhanced blocks.
//!
//! Copying reads the rendered content cells back to plain text, hands the
//! text to a [`Clipboard`], and flips the block's copy button into a
//! transient "copied" state. The revert runs as a local task after
//! [`EnhanceOptions::revert_after`]; its [`ScheduledRevert`] handle lets a
//! caller cancel or await it. Presses that overlap each schedule their own
//! revert, and an earlier one is never cancelled implicitly.
//!
//! Reverts are spawned with [`tokio::task::spawn_local`], so
//! [`CopyController::copy`] must run inside a [`tokio::task::LocalSet`].

use std::time::Duration;

use kuchikiki::NodeRef;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::classes;
use crate::clipboard::Clipboard;
use crate::dom;
use crate::error::LineupResult;
use crate::options::{EnhanceOptions, Markers};

/// `aria-label` of an idle copy button.
pub const IDLE_LABEL: &str = "Copy code";
/// `aria-label` while the button shows the copied state.
pub const COPIED_LABEL: &str = "Copied!";

/// How lines are turned into copied text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CopyKind {
    /// The visible text of every line.
    #[default]
    Default,
    /// Commands only: prompts are stripped and output lines are skipped.
    Console,
}

impl CopyKind {
    /// The kind an enhanced block was rendered with.
    ///
    /// Blocks with a copy button carry it in `data-copy-kind`; single-line
    /// blocks fall back to their `data-language`.
    pub fn for_block(block: &NodeRef, console_language: &str) -> Self {
        if let Some(button) = CopyButton::find(block) {
            return button.kind();
        }
        if dom::attr(block, "data-language").as_deref() == Some(console_language) {
            Self::Console
        } else {
            Self::Default
        }
    }

    pub fn extractor<'a>(&self, markers: &'a Markers) -> Box<dyn LineExtractor + 'a> {
        match self {
            Self::Default => Box::new(VisibleText),
            Self::Console => Box::new(ConsoleCommands { markers }),
        }
    }
}

/// Maps one content cell to the text it contributes, if any.
pub trait LineExtractor {
    fn extract(&self, cell: &NodeRef) -> Option<String>;
}

impl<F> LineExtractor for F
where
    F: Fn(&NodeRef) -> Option<String>,
{
    fn extract(&self, cell: &NodeRef) -> Option<String> {
        self(cell)
    }
}

/// The cell's visible text.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibleText;

impl LineExtractor for VisibleText {
    fn extract(&self, cell: &NodeRef) -> Option<String> {
        Some(cell.text_contents())
    }
}

/// Console commands without their prompts; output lines contribute nothing.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleCommands<'a> {
    pub markers: &'a Markers,
}

impl LineExtractor for ConsoleCommands<'_> {
    fn extract(&self, cell: &NodeRef) -> Option<String> {
        let is_output = cell
            .inclusive_descendants()
            .any(|node| dom::has_class(&node, &self.markers.output));
        if is_output {
            return None;
        }

        let text_wrapper = cell
            .descendants()
            .find(|node| dom::has_class(node, classes::LINE_TEXT));
        Some(text_wrapper.unwrap_or_else(|| cell.clone()).text_contents())
    }
}

/// The text a copy of `block` puts on the clipboard.
///
/// Content cells are read in document order; lines whose extraction is empty
/// or absent are dropped and the rest are joined with `\n`.
pub fn copy_text<E>(block: &NodeRef, extractor: &E) -> LineupResult<String>
where
    E: LineExtractor + ?Sized,
{
    let cells = dom::select_all(block, &format!("td.{}", classes::LINE_CONTENT))?;
    let lines: Vec<String> = cells
        .iter()
        .filter_map(|cell| extractor.extract(cell))
        .filter(|line| !line.is_empty())
        .collect();
    Ok(lines.join("\n"))
}

/// The copy button of an enhanced block.
#[derive(Debug, Clone)]
pub struct CopyButton {
    node: NodeRef,
}

impl CopyButton {
    pub fn find(block: &NodeRef) -> Option<Self> {
        let selector = format!("button.{}", classes::COPY_BUTTON);
        let node = dom::select_all(block, &selector).ok()?.into_iter().next()?;
        Some(Self { node })
    }

    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    pub fn kind(&self) -> CopyKind {
        dom::attr(&self.node, "data-copy-kind")
            .and_then(|kind| kind.parse().ok())
            .unwrap_or_default()
    }

    pub fn label(&self) -> Option<String> {
        dom::attr(&self.node, "aria-label")
    }

    pub fn is_copied(&self) -> bool {
        self.label().as_deref() == Some(COPIED_LABEL)
    }

    pub fn mark_copied(&self) {
        dom::set_attr(&self.node, "aria-label", COPIED_LABEL);
        if let Some(icon) = dom::first_element_child(&self.node) {
            dom::replace_class(&icon, classes::ICON_COPY, classes::ICON_COPIED);
        }
    }

    pub fn revert(&self) {
        dom::set_attr(&self.node, "aria-label", IDLE_LABEL);
        if let Some(icon) = dom::first_element_child(&self.node) {
            dom::replace_class(&icon, classes::ICON_COPIED, classes::ICON_COPY);
        }
    }
}

/// Handle to the pending revert of a copy button.
#[derive(Debug)]
pub struct ScheduledRevert {
    task: Option<JoinHandle<()>>,
}

impl ScheduledRevert {
    fn spawn(button: CopyButton, after: Duration) -> Self {
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(after).await;
            button.revert();
        });
        Self { task: Some(task) }
    }

    /// A handle with nothing scheduled (the block had no copy button).
    fn none() -> Self {
        Self { task: None }
    }

    pub fn is_scheduled(&self) -> bool {
        self.task.is_some()
    }

    /// Cancels the revert; the button keeps its copied state.
    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Waits for the revert. Returns `false` if it was cancelled or never scheduled.
    pub async fn wait(self) -> bool {
        match self.task {
            Some(task) => task.await.is_ok(),
            None => false,
        }
    }
}

/// Copies blocks to a clipboard and drives the copy button state.
pub struct CopyController<C> {
    clipboard: C,
    markers: Markers,
    revert_after: Duration,
}

impl<C: Clipboard> CopyController<C> {
    pub fn new(clipboard: C, options: &EnhanceOptions) -> Self {
        Self {
            clipboard,
            markers: options.markers.clone(),
            revert_after: options.revert_after(),
        }
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Copies `block` and marks its button as copied.
    ///
    /// Clipboard failures are returned and leave the button untouched.
    pub async fn copy(&self, block: &NodeRef, kind: CopyKind) -> LineupResult<ScheduledRevert> {
        let extractor = kind.extractor(&self.markers);
        let text = copy_text(block, extractor.as_ref())?;
        self.clipboard.write_text(&text).await?;
        debug!(kind = %kind, bytes = text.len(), "copied code block");

        match CopyButton::find(block) {
            Some(button) => {
                button.mark_copied();
                Ok(ScheduledRevert::spawn(button, self.revert_after))
            }
            None => Ok(ScheduledRevert::none()),
        }
    }
}
