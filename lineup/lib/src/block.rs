//! Per-block configuration and assembly of the enhanced block markup.

use crate::anchors::Slugger;
use crate::classes;
use crate::copy::CopyKind;
use crate::extract::{CodeBlockSource, LineRecord};
use crate::ids::BlockId;
use crate::options::{EnhanceOptions, Variant};
use crate::render::{RowContext, render_row};

/// Language used when neither the container nor the code element names one.
pub const FALLBACK_LANGUAGE: &str = "text";

/// Slug stem used when a title slugs to nothing.
const FALLBACK_TITLE_SLUG: &str = "code-block";

/// Per-block settings read from the source container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockConfig {
    pub variant: Variant,
    pub title: Option<String>,
    /// Raw `data-highlight` value, parsed once the line count is known.
    pub highlight: Option<String>,
    pub language: Option<String>,
}

impl BlockConfig {
    pub fn read(source: &CodeBlockSource, default_variant: Variant) -> Self {
        let title = source
            .attr("data-title")
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty());

        Self {
            variant: Variant::resolve(source.attr("data-variant").as_deref(), default_variant),
            title,
            highlight: source.attr("data-highlight"),
            language: source.language(),
        }
    }

    pub fn language_or_fallback(&self) -> &str {
        self.language.as_deref().unwrap_or(FALLBACK_LANGUAGE)
    }

    pub fn is_console(&self, console_language: &str) -> bool {
        self.language.as_deref() == Some(console_language)
    }

    pub fn copy_kind(&self, console_language: &str) -> CopyKind {
        if self.is_console(console_language) {
            CopyKind::Console
        } else {
            CopyKind::Default
        }
    }
}

/// Everything needed to render one enhanced block.
pub struct BlockLayout<'a> {
    pub id: &'a BlockId,
    pub ordinal: usize,
    pub config: &'a BlockConfig,
    pub options: &'a EnhanceOptions,
    pub slugger: &'a dyn Slugger,
}

impl BlockLayout<'_> {
    /// The id given to the title element, `{slug}-{N}`.
    pub fn title_id(&self) -> Option<String> {
        let title = self.config.title.as_deref()?;
        let mut slug = self.slugger.slug(title);
        if slug.is_empty() {
            slug = FALLBACK_TITLE_SLUG.to_string();
        }
        Some(format!("{slug}-{}", self.ordinal))
    }

    /// Serializes the block root with its header, rows, and copy button.
    pub fn render(&self, lines: &[LineRecord]) -> String {
        let config = self.config;
        let language = config.language_or_fallback();
        let show_line_numbers = config.variant.shows_line_numbers();
        let console = config
            .is_console(&self.options.console_language)
            .then_some(&self.options.markers);

        let mut root_classes = vec![
            classes::BLOCK.to_string(),
            classes::PROCESSED.to_string(),
            format!("language-{language}"),
        ];
        if !show_line_numbers {
            root_classes.push(classes::NO_LINE_NUMBERS.to_string());
        }
        if let Some(mode) = self.options.color_mode {
            root_classes.push(format!("theme-{mode}"));
        }

        let mut html = format!(
            r#"<div id="{}" class="{}" data-language="{}">"#,
            attr_escape(self.id.as_str()),
            attr_escape(&root_classes.join(" ")),
            attr_escape(language),
        );

        if let (Some(title), Some(title_id)) = (config.title.as_deref(), self.title_id()) {
            html.push_str(&format!(
                r#"<div class="{}"><span class="{}" id="{}">{}</span></div>"#,
                classes::HEADER,
                classes::TITLE,
                attr_escape(&title_id),
                html_escape::encode_text(title),
            ));
        }

        let context = RowContext {
            block_id: self.id,
            show_line_numbers,
            console,
        };
        html.push_str(&format!(
            r#"<table class="{}"><tbody class="{}">"#,
            classes::TABLE,
            classes::ROWS
        ));
        for line in lines {
            html.push_str(&render_row(line, &context).html);
        }
        html.push_str("</tbody></table>");

        if lines.len() > 1 {
            html.push_str(&format!(
                r#"<button type="button" class="{}" aria-label="{}" data-copy-kind="{}"><span class="{}" aria-hidden="true"></span></button>"#,
                classes::COPY_BUTTON,
                crate::copy::IDLE_LABEL,
                config.copy_kind(&self.options.console_language),
                classes::ICON_COPY,
            ));
        }

        html.push_str("</div>");
        html
    }
}

fn attr_escape(value: &str) -> std::borrow::Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}
