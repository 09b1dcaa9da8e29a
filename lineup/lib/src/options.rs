//! Configuration for the enhancement pass.
//!
//! Options follow the usual layering: [`EnhanceOptions::default()`] provides
//! sensible values, a TOML file may override any subset of them, and callers
//! (such as the CLI) apply explicit overrides last.
//!
//! ## Examples
//!
//! ```
//! use lineup_lib::{EnhanceOptions, Variant};
//!
//! let options = EnhanceOptions::from_toml_str(r#"
//!     default_variant = "no-line-numbers"
//!     id_prefix = "snippet"
//! "#).unwrap();
//!
//! assert_eq!(options.default_variant, Variant::NoLineNumbers);
//! assert_eq!(options.id_prefix, "snippet");
//! assert_eq!(options.console_language, "console");
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{LineupError, LineupResult};

/// Per-block rendering variant.
///
/// Read from the `data-variant` attribute of a source container. Values that
/// are missing or not recognized fall back to
/// [`EnhanceOptions::default_variant`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Leave the block as rendered upstream (it is only marked as processed).
    Legacy,
    /// Enhance the block without the line-number column.
    NoLineNumbers,
    /// Full enhancement: line numbers, selection, highlighting, copy.
    #[default]
    Enhanced,
}

impl Variant {
    /// Resolves an attribute value, falling back when it is absent or unknown.
    ///
    /// ```
    /// use lineup_lib::Variant;
    ///
    /// assert_eq!(Variant::resolve(Some("legacy"), Variant::Enhanced), Variant::Legacy);
    /// assert_eq!(Variant::resolve(Some("fancy"), Variant::NoLineNumbers), Variant::NoLineNumbers);
    /// assert_eq!(Variant::resolve(None, Variant::Enhanced), Variant::Enhanced);
    /// ```
    pub fn resolve(value: Option<&str>, fallback: Variant) -> Variant {
        value
            .and_then(|v| v.trim().parse::<Variant>().ok())
            .unwrap_or(fallback)
    }

    /// Whether blocks of this variant render a line-number column.
    pub fn shows_line_numbers(&self) -> bool {
        matches!(self, Self::Enhanced)
    }
}

/// Cosmetic color mode signal supplied by the page theme.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Light,
    Dark,
}

/// Class names the upstream highlighter uses for console tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    /// Shell prompt token (`$ `, `# `, ...).
    pub prompt: String,
    /// Program output line.
    pub output: String,
    /// Whitespace token.
    pub whitespace: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            prompt: "gp".to_string(),
            output: "go".to_string(),
            whitespace: "w".to_string(),
        }
    }
}

/// Options for an enhancement pass with sensible defaults.
///
/// ## Examples
///
/// ```
/// use lineup_lib::{ColorMode, EnhanceOptions, Variant};
///
/// let mut options = EnhanceOptions::default();
/// options.default_variant = Variant::NoLineNumbers;
/// options.color_mode = Some(ColorMode::Dark);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct EnhanceOptions {
    /// Variant used when a block does not specify a recognized one.
    pub default_variant: Variant,
    /// Prefix of enhanced block ids (`{prefix}-{N}`).
    pub id_prefix: String,
    /// Language id that enables console prompt handling.
    pub console_language: String,
    /// Console marker classes.
    pub markers: Markers,
    /// Optional theme signal, adds a `theme-{mode}` class to each block.
    pub color_mode: Option<ColorMode>,
    /// Delay before a copy button returns to its idle state.
    pub revert_after_ms: u64,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            default_variant: Variant::default(),
            id_prefix: "codeblock".to_string(),
            console_language: "console".to_string(),
            markers: Markers::default(),
            color_mode: None,
            revert_after_ms: 2000,
        }
    }
}

impl EnhanceOptions {
    /// Parses options from TOML; keys that are absent keep their defaults.
    pub fn from_toml_str(content: &str) -> LineupResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a TOML options file.
    pub fn from_path(path: &Path) -> LineupResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| LineupError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// The copy-button revert delay.
    pub fn revert_after(&self) -> Duration {
        Duration::from_millis(self.revert_after_ms)
    }
}
