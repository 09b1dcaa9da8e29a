//! CLI for enhancing the code blocks of rendered HTML pages.
//!
//! ## Usage
//!
//! ```bash
//! # Enhance a page, writing the result to stdout
//! lineup site/guide.html
//!
//! # Read from stdin, write to a file
//! cat guide.html | lineup -o guide.enhanced.html
//!
//! # Print what the copy button of block 0 would copy
//! lineup guide.html --copy 0
//!
//! # Generate shell completions
//! source <(COMPLETE=bash lineup)
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, CommandFactory, Parser, ValueHint};
use clap_complete::Shell;
use color_eyre::eyre::{Context, Result, eyre};
use lineup_lib::clipboard::Osc52Clipboard;
use lineup_lib::dom;
use lineup_lib::{
    BlockId, ColorMode, CopyController, CopyKind, EnhanceOptions, Enhancer, NodeRef, Variant, copy_text,
};
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Add line numbers, highlighting, titles, and copy buttons to HTML code blocks
#[derive(Parser)]
#[command(name = "lineup", version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// HTML file to enhance (reads stdin when omitted or "-")
    #[arg(value_name = "INPUT", value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Write the enhanced HTML here instead of stdout
    #[arg(short, long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// TOML file with enhancement options
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Variant for blocks without a recognized data-variant
    /// (legacy, no-line-numbers, enhanced)
    #[arg(long, value_name = "VARIANT")]
    default_variant: Option<Variant>,

    /// Prefix of enhanced block ids
    #[arg(long, value_name = "PREFIX")]
    prefix: Option<String>,

    /// Add a theme-light or theme-dark class to each block
    #[arg(long, value_name = "MODE")]
    color_mode: Option<ColorMode>,

    /// Print the copy text of block N instead of the document
    #[arg(long, value_name = "N", conflicts_with = "output")]
    copy: Option<usize>,

    /// With --copy, set the terminal clipboard via OSC 52 instead of printing
    #[arg(long, requires = "copy")]
    osc52: bool,

    /// Print the pass report as JSON to stderr
    #[arg(long)]
    report: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

const AFTER_HELP: &str = "\
SHELL COMPLETIONS:
  Enable tab completions by adding one line to your shell config:

  Bash (~/.bashrc):
    source <(COMPLETE=bash lineup)

  Zsh (~/.zshrc):
    source <(COMPLETE=zsh lineup)

  Fish (~/.config/fish/config.fish):
    COMPLETE=fish lineup | source

EXAMPLES:
  lineup page.html                        # enhanced HTML to stdout
  lineup page.html -o out.html --report   # write a file, report on stderr
  lineup page.html --prefix snippet       # ids snippet-0, snippet-1, ...
  lineup page.html --copy 2 --osc52       # copy block 2 to the terminal clipboard
";

/// Initialize tracing subscriber based on verbosity level.
///
/// Verbosity levels:
/// - 0 (default): silent unless `RUST_LOG` is set
/// - 1 (-v): INFO (pass summary)
/// - 2 (-vv): DEBUG (one line per block)
/// - 3 (-vvv): TRACE
/// - 4+ (-vvvv): TRACE with file/line numbers
fn init_tracing(verbose: u8) {
    let env_filter = std::env::var("RUST_LOG").ok();
    if verbose == 0 && env_filter.is_none() {
        return;
    }

    let base_filter = match env_filter {
        Some(filter) => filter,
        None => match verbose {
            1 => "warn,lineup=info,lineup_lib=info".to_string(),
            2 => "warn,lineup=debug,lineup_lib=debug".to_string(),
            _ => "info,lineup=trace,lineup_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(verbose >= 4)
                .with_line_number(verbose >= 4)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    // Check for shell completion generation before parsing args
    if let Ok(shell_name) = std::env::var("COMPLETE") {
        return generate_completions(&shell_name);
    }

    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = resolve_options(&cli)?;
    let html = read_input(cli.input.as_deref())?;

    let document = dom::parse_document(&html);
    let mut enhancer = Enhancer::new(options.clone());
    let report = enhancer
        .enhance(&document)
        .wrap_err("Failed to enhance code blocks")?;

    if cli.report {
        eprintln!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let Some(ordinal) = cli.copy {
        return copy_block(&document, &options, ordinal, cli.osc52);
    }

    write_output(cli.output.as_deref(), &dom::outer_html(&document))
}

/// Defaults, then the `--config` file, then explicit flags.
fn resolve_options(cli: &Cli) -> Result<EnhanceOptions> {
    let mut options = match &cli.config {
        Some(path) => EnhanceOptions::from_path(path)
            .wrap_err_with(|| format!("Failed to load config from {}", path.display()))?,
        None => EnhanceOptions::default(),
    };

    if let Some(variant) = cli.default_variant {
        options.default_variant = variant;
    }
    if let Some(prefix) = &cli.prefix {
        options.id_prefix = prefix.clone();
    }
    if let Some(mode) = cli.color_mode {
        options.color_mode = Some(mode);
    }

    debug!(?options, "resolved options");
    Ok(options)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .wrap_err("Failed to read from stdin")?;
            Ok(content)
        }
    }
}

fn write_output(output: Option<&Path>, html: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, html).wrap_err_with(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Prints (or pushes via OSC 52) what the copy button of a block copies.
fn copy_block(document: &NodeRef, options: &EnhanceOptions, ordinal: usize, osc52: bool) -> Result<()> {
    let id = BlockId::new(&options.id_prefix, ordinal);
    let block = dom::find_by_id(document, id.as_str())
        .ok_or_else(|| eyre!("No enhanced block with id `{id}`"))?;
    let kind = CopyKind::for_block(&block, &options.console_language);

    if !osc52 {
        let text = copy_text(&block, kind.extractor(&options.markers).as_ref())?;
        println!("{text}");
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .wrap_err("Failed to start async runtime")?;
    let local = tokio::task::LocalSet::new();
    let controller = CopyController::new(Osc52Clipboard::new(io::stdout()), options);
    local
        .block_on(&runtime, controller.copy(&block, kind))
        .wrap_err_with(|| format!("Failed to copy `{id}`"))?;
    Ok(())
}

/// Generate shell completions and exit.
fn generate_completions(shell_name: &str) -> Result<()> {
    let shell = match shell_name.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "powershell" => Shell::PowerShell,
        "elvish" => Shell::Elvish,
        _ => {
            return Err(eyre!(
                "Unknown shell: {shell_name}. Supported: bash, zsh, fish, powershell, elvish"
            ));
        }
    };

    clap_complete::generate(shell, &mut Cli::command(), "lineup", &mut io::stdout());
    Ok(())
}
