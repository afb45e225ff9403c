use clap::{Parser, Subcommand, ValueEnum};
use std::path::Path;
use topdown_ini::IniError;
use topdown_parser::Token;
use topdown_source::Eol;

#[derive(Parser)]
#[command(name = "topdown")]
#[command(about = "Check and inspect INI-style configuration files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and report the first error, if any
    Check {
        /// Input file
        path: String,

        /// End-of-line convention: lf, cr, lfcr, crlf or rs
        #[arg(long, default_value = "lf")]
        eol: Eol,
    },

    /// Parse a file and print its token tree
    Dump {
        /// Input file
        path: String,

        /// End-of-line convention: lf, cr, lfcr, crlf or rs
        #[arg(long, default_value = "lf")]
        eol: Eol,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Tree)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Indented tree
    Tree,
    /// JSON document
    Json,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Check { path, eol } => cmd_check(&path, eol),
        Command::Dump { path, eol, format } => cmd_dump(&path, eol, format),
    }
}

/// Install a `fmt` subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=topdown_parser=trace` to follow every backtrack.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn load(path: &str, eol: Eol) -> Token {
    if !Path::new(path).exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match topdown_ini::parse_file(path, eol) {
        Ok(tree) => tree,
        Err(IniError::Parse(e)) => {
            eprintln!("Parse error: {e}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_check(path: &str, eol: Eol) {
    let tree = load(path, eol);
    tracing::info!(sections = tree.children().len(), "check passed");
    eprintln!("OK: {path}");
}

fn cmd_dump(path: &str, eol: Eol, format: Format) {
    let tree = load(path, eol);
    match format {
        Format::Tree => print!("{}", tree.to_tree_string()),
        Format::Json => match serde_json::to_string_pretty(&tree) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing {path}: {e}");
                std::process::exit(1);
            }
        },
    }
}
