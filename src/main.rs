use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use web_element_inspector::{HtmlOptions, Inspection, InspectorConfig, ReportMode};

#[derive(Parser, Debug)]
#[command(
    name = "web-element-inspector",
    version,
    about = "Inspect the attributes assistive technology sees on a web element",
    long_about = "A command-line tool for inspecting the accessibility attributes of a web \
        element, its ancestors, and optionally its children.\n\n\
        Sources can be an HTML file, an http(s) URL, or a JSON accessibility-tree \
        fixture. Attributes are normalized and augmented with inferred values \
        (link targets, form-field hints, toggle states) before rendering.\n\n\
        Examples:\n  \
        web-element-inspector inspect page.html --select \"#search\"\n  \
        web-element-inspector inspect https://example.com/ --select a --format html\n  \
        web-element-inspector inspect tree.json --node submit --advanced\n  \
        web-element-inspector order href tag aria-checked"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "text",
        help = "Output format",
        long_help = "Output format.\n  text     — Plain-text report (default)\n  html     — Heading-navigable HTML\n  markdown — Markdown converted from the HTML report\n  json     — JSON (best for programmatic use)"
    )]
    format: OutputFormat,

    #[arg(long, global = true, help = "JSON config file with inspection limits")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Log the inspection trail and node dumps")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Html,
    Markdown,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect the focused element of a document
    ///
    /// Reports the element, the element it was promoted from (if any), and
    /// every tag-bearing ancestor up to the document.
    #[command(long_about = "Inspect the focused element of a document.\n\n\
        Reports the element, the element it was promoted from (if any), and\n\
        every tag-bearing ancestor up to the document. With --advanced the\n\
        element's descendants are listed too.\n\n\
        SOURCE is an HTML file, an http(s) URL, or a .json tree fixture:\n  \
        web-element-inspector inspect page.html --select \"button.primary\"\n  \
        web-element-inspector inspect tree.json --node link")]
    Inspect {
        /// HTML file, http(s) URL, or JSON tree fixture
        source: String,

        #[arg(long, short, help = "CSS selector of the focused element (HTML sources)")]
        select: Option<String>,

        #[arg(long, short, help = "Node key to inspect (JSON fixtures)")]
        node: Option<String>,

        #[arg(long, help = "Document URL used to resolve relative links")]
        url: Option<String>,

        #[arg(long, short, help = "Also explore the element's children")]
        advanced: bool,
    },

    /// Print attribute keys in report order
    Order {
        /// Attribute keys (aliases are normalized)
        keys: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug {
            "web_element_inspector=debug"
        } else {
            "warn"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, debug: bool) -> anyhow::Result<InspectorConfig> {
    let mut config = match path {
        Some(path) => InspectorConfig::load(path)?,
        None => InspectorConfig::from_env()?,
    };
    config.debug |= debug;
    Ok(config)
}

fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(cli.config.as_deref(), cli.debug)?;
    init_logging(config.debug);

    match cli.command {
        Command::Inspect {
            source,
            select,
            node,
            url,
            advanced,
        } => {
            let mode = if advanced {
                ReportMode::Advanced
            } else {
                ReportMode::Basic
            };

            let inspection = if source.to_ascii_lowercase().ends_with(".json") {
                let json = std::fs::read_to_string(&source)
                    .with_context(|| format!("Failed to read {}", source))?;
                web_element_inspector::inspect_fixture(&json, node.as_deref(), mode, &config)?
            } else {
                let (html, location) = if is_remote(&source) {
                    let html = web_element_inspector::fetch_document(&source).await?;
                    (html, url.or(Some(source)))
                } else {
                    let html = std::fs::read_to_string(&source)
                        .with_context(|| format!("Failed to read {}", source))?;
                    (html, url)
                };
                let options = HtmlOptions {
                    url: location,
                    selector: select,
                };
                web_element_inspector::inspect_html(&html, &options, mode, &config)?
            };

            print_output(&cli.format, &inspection)?;
            Ok(match inspection {
                Inspection::Report(_) => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            })
        }

        Command::Order { keys } => {
            let ordered = web_element_inspector::report_order(&keys);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ordered)?),
                _ => {
                    for key in ordered {
                        println!("{key}");
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Print an inspection in the requested format
fn print_output(fmt: &OutputFormat, inspection: &Inspection) -> anyhow::Result<()> {
    match fmt {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(inspection)?),
        OutputFormat::Text => print!("{}", web_element_inspector::render_text(inspection)),
        OutputFormat::Html => println!("{}", web_element_inspector::render_html(inspection)),
        OutputFormat::Markdown => {
            println!("{}", web_element_inspector::render_markdown(inspection))
        }
    }
    Ok(())
}
