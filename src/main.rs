//! lcars-layout CLI
//!
//! Usage:
//!   lcars-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -W, --width <PX>         Card width when the panel does not declare one
//!   -H, --height <PX>        Card height when the panel does not declare one
//!       --dynamic-height     Grow the card to fit its content
//!   -s, --stylesheet <FILE>  Colour palette (TOML format)
//!   -d, --debug              Outline every element and log its box
//!       --strict             Fail on dependency cycles and unresolved elements
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lcars_layout::{render_panel, Panel, RenderConfig, Stylesheet};

#[derive(Parser)]
#[command(name = "lcars-layout")]
#[command(about = "Lay out and render LCARS style SVG panels")]
struct Cli {
    /// Panel file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Card width when the panel does not declare one
    #[arg(short = 'W', long, default_value_t = 600.0)]
    width: f64,

    /// Card height when the panel does not declare one
    #[arg(short = 'H', long, default_value_t = 200.0)]
    height: f64,

    /// Grow the card to fit its content
    #[arg(long)]
    dynamic_height: bool,

    /// Stylesheet file for the colour palette (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Debug mode: outline every element and log computed boxes
    #[arg(short, long)]
    debug: bool,

    /// Fail on dependency cycles and unresolved elements
    #[arg(long)]
    strict: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "lcars_layout=debug" } else { "lcars_layout=warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Stylesheet::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let panel = match Panel::from_str(&source) {
        Ok(panel) => panel,
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };

    let config = RenderConfig::new()
        .with_stylesheet(stylesheet)
        .with_card(cli.width, cli.height)
        .with_dynamic_height(cli.dynamic_height)
        .with_debug(cli.debug)
        .with_strict(cli.strict);
    match render_panel(&panel, &config) {
        Ok(svg) => {
            println!("{}", svg);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
