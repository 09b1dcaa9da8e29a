//! Clipboard sinks for copied code.

use std::cell::RefCell;
use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{LineupError, LineupResult};

/// Destination of a copy action.
///
/// The write is asynchronous because real clipboards (browser, system
/// services) may take a while or refuse; failures are returned to the caller.
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> LineupResult<()>;
}

/// In-process clipboard that remembers every write.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: RefCell<Vec<String>>,
    unavailable: bool,
}

impl MemoryClipboard {
    /// A clipboard that rejects every write.
    pub fn unavailable() -> Self {
        Self {
            writes: RefCell::default(),
            unavailable: true,
        }
    }

    /// The most recent text written.
    pub fn contents(&self) -> Option<String> {
        self.writes.borrow().last().cloned()
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> LineupResult<()> {
        if self.unavailable {
            return Err(LineupError::Clipboard("clipboard is unavailable".to_string()));
        }
        self.writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// Sets the terminal clipboard with an OSC 52 escape sequence.
///
/// The sequence is `ESC ] 52 ; c ; <base64> BEL`, written to any writer
/// (usually stdout of a terminal that supports it).
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// Builds the OSC 52 sequence for `text` without writing it.
///
/// ```
/// use lineup_lib::clipboard::osc52_sequence;
///
/// assert_eq!(osc52_sequence("hi"), "\x1b]52;c;aGk=\x07");
/// ```
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    async fn write_text(&self, text: &str) -> LineupResult<()> {
        let failed = |e: std::io::Error| LineupError::Clipboard(e.to_string());
        let mut writer = self.writer.borrow_mut();
        writer.write_all(osc52_sequence(text).as_bytes()).map_err(failed)?;
        writer.flush().map_err(failed)
    }
}
