use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tagback::{CallbackRegistry, LoadError, Options, ParseError, ScenarioSet, Settings, XmlParser};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "tagback")]
#[command(about = "Check and load flat markup configuration files", long_about = None)]
struct Cli {
    /// Columns a tab advances when reporting error positions
    #[arg(long, default_value_t = 4)]
    tab_width: usize,

    /// Bytes of input shown after an error offset
    #[arg(long, default_value_t = 10)]
    excerpt_len: usize,

    /// Accept files that end while tags are still open
    #[arg(long)]
    allow_unclosed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the tag structure of a file without interpreting it
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Load a settings file and print the result
    Settings {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Load a scenario file and print every scenario in it
    Scenario {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("could not read {}", path.display()))
}

fn report(error: &ParseError, buffer: &[u8], options: &Options) -> ! {
    eprintln!("{}", error.diagnostic(buffer, options));
    std::process::exit(1);
}

fn main() -> Result<()> {
    // RUST_LOG controls verbosity, e.g. RUST_LOG=tagback=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = Options {
        tab_width: cli.tab_width,
        excerpt_len: cli.excerpt_len,
        allow_unclosed: cli.allow_unclosed,
    };

    match cli.command {
        Command::Check { file } => {
            let buffer = read(&file)?;
            let mut parser = XmlParser::new(&buffer).with_options(options.clone());
            if let Err(error) = parser.parse(&mut CallbackRegistry::new()) {
                report(&error, &buffer, &options);
            }
            println!("{}: ok, {} elements", file.display(), parser.elements());
        }
        Command::Settings { file } => {
            let buffer = read(&file)?;
            match Settings::from_bytes_with(&buffer, &options) {
                Ok(settings) => println!("{settings:#?}"),
                Err(LoadError::Parse(error)) => report(&error, &buffer, &options),
                Err(error) => return Err(error.into()),
            }
        }
        Command::Scenario { file } => {
            let buffer = read(&file)?;
            match ScenarioSet::from_bytes_with(&buffer, &options) {
                Ok(scenarios) => {
                    for scenario in scenarios.iter() {
                        println!("{scenario:#?}");
                    }
                }
                Err(LoadError::Parse(error)) => report(&error, &buffer, &options),
                Err(error) => return Err(error.into()),
            }
        }
    }
    Ok(())
}
