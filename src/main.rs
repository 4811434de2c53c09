//! nativeterm - enable ANSI output and inspect the terminal
//!
//! # Quick Start
//!
//! ```text
//! nativeterm                          # Enable ANSI on stdout
//! nativeterm size                     # Print terminal size
//! nativeterm register <root> <out>    # Bundle the native artifact
//! ```

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nativeterm::config::Config;
use nativeterm::registrar::{DirectorySource, ImageManifest, Registrar};
use nativeterm::PlatformKey;

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding a tracing filter directive
const LOG_ENV: &str = "NATIVETERM_LOG";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Ansi,
    Size,
    Register {
        artifact_root: Option<PathBuf>,
        out_dir: PathBuf,
    },
}

fn print_version() {
    eprintln!("nativeterm {}", VERSION);
}

fn print_help() {
    eprintln!("nativeterm {} - ANSI output and terminal size", VERSION);
    eprintln!();
    eprintln!("Usage: nativeterm [OPTIONS] [COMMAND]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  ansi (default)                  Enable ANSI escape sequences on stdout");
    eprintln!("  size                            Print the terminal size as COLSxROWS");
    eprintln!("  register [ROOT] <OUT>           Expose native structures and copy the");
    eprintln!("                                  artifact for this platform from ROOT");
    eprintln!("                                  (or resources.artifact_root) into OUT");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, --version                   Show version");
    eprintln!("  -h, --help                      Show this help");
    eprintln!();
    eprintln!("Configuration: ~/.nativeterm/config.toml");
    eprintln!("Logging:       {}=debug", LOG_ENV);
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut positional = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            a if a.starts_with('-') => {
                return Err(format!("Unknown argument: {}. Use -h for help.", a));
            }
            a => positional.push(a.to_string()),
        }
    }

    let Some((command, rest)) = positional.split_first() else {
        return Ok(Command::Ansi);
    };

    match (command.as_str(), rest) {
        ("ansi", []) => Ok(Command::Ansi),
        ("size", []) => Ok(Command::Size),
        ("register", [out]) => Ok(Command::Register {
            artifact_root: None,
            out_dir: PathBuf::from(out),
        }),
        ("register", [root, out]) => Ok(Command::Register {
            artifact_root: Some(PathBuf::from(root)),
            out_dir: PathBuf::from(out),
        }),
        ("register", _) => Err("Usage: nativeterm register [ROOT] <OUT>".to_string()),
        (cmd, []) => Err(format!("Unknown command: {}. Use -h for help.", cmd)),
        (cmd, _) => Err(format!("Too many arguments for {}", cmd)),
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_file = config.logging.file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let config = Config::load();
    init_logging(&config);

    info!("nativeterm {} starting...", VERSION);

    match command {
        Command::Ansi => run_ansi(),
        Command::Size => run_size(),
        Command::Register { artifact_root, out_dir } => run_register(&config, artifact_root, out_dir),
    }
}

fn run_ansi() -> anyhow::Result<()> {
    let enabled = nativeterm::enable_ansi().context("Failed to enable ANSI output")?;
    info!("ANSI passthrough enabled: {}", enabled);

    if !enabled {
        error!("Console rejected virtual terminal processing");
        std::process::exit(2);
    }
    Ok(())
}

fn run_size() -> anyhow::Result<()> {
    let size = nativeterm::terminal_size().context("Failed to query terminal size")?;
    info!("Terminal size: {}", size);
    println!("{}", size);
    Ok(())
}

fn run_register(
    config: &Config,
    artifact_root: Option<PathBuf>,
    out_dir: PathBuf,
) -> anyhow::Result<()> {
    let Some(root) = artifact_root.or_else(|| config.resources.artifact_root.clone()) else {
        bail!("No artifact root given and resources.artifact_root is not set");
    };

    let platform = PlatformKey::current();
    match platform {
        Some(p) => info!("Registering native capabilities for {}", p),
        None => info!("Unsupported platform, only exposing structures"),
    }

    let registrar = Registrar::new(
        platform,
        config.resources.layout(),
        DirectorySource::new(&root),
        ImageManifest::new(),
    );
    registrar.initialize()?;

    let image = registrar.builder();
    let written = image
        .write_to(&out_dir)
        .with_context(|| format!("Failed to write resources to {}", out_dir.display()))?;

    info!(
        "Exposed {} structures, wrote {} resource(s) to {}",
        image.exposed_groups().len(),
        written,
        out_dir.display()
    );
    for path in image.resource_paths() {
        println!("{}", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_command() {
        assert_eq!(parse_args(&[]), Ok(Command::Ansi));
        assert_eq!(parse_args(&args(&["size"])), Ok(Command::Size));
    }

    #[test]
    fn test_register_args() {
        assert_eq!(
            parse_args(&args(&["register", "out"])),
            Ok(Command::Register { artifact_root: None, out_dir: PathBuf::from("out") })
        );
        assert_eq!(
            parse_args(&args(&["register", "pkg", "out"])),
            Ok(Command::Register {
                artifact_root: Some(PathBuf::from("pkg")),
                out_dir: PathBuf::from("out"),
            })
        );
        assert!(parse_args(&args(&["register"])).is_err());
    }

    #[test]
    fn test_unknown_arguments() {
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["paint"])).is_err());
        assert!(parse_args(&args(&["size", "extra"])).is_err());
    }
}
