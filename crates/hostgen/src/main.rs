// # hostgen - Host Config Generator
//
// The hostgen binary is a thin integration layer. It is responsible for:
// 1. Parsing command-line options
// 2. Initializing logging
// 3. Registering writers and choosing a network source
// 4. Running the engine once and writing the result
//
// All derivation logic lives in hostgen-core.
//
// ## Usage
//
// ```bash
// hostgen hosts.yaml dnsmasq > /etc/dnsmasq.d/hosts.conf
// hostgen -c hosts.yaml -o /etc/nsd/hosts.zone zone
// hostgen --snapshot router.json hosts.yaml env
// ```
//
// ## Environment
//
// - `HOSTGEN_CONFIG`: Configuration file (default `hosts.yaml`)
// - `HOSTGEN_LOG_LEVEL`: trace, debug, info, warn or error (default `warn`)
//
// Logs go to stderr so stdout only ever carries generated records.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hostgen_core::{FileNetworkSource, HostConfig, HostgenEngine, NetworkSource, WriterRegistry};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_CONFIG: &str = "hosts.yaml";

/// Exit codes for different termination scenarios
///
/// - 0: Records written
/// - 1: Configuration or input error
/// - 2: Runtime error (snapshot, I/O, writer)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostgenExitCode {
    /// Records written
    Success = 0,
    /// Configuration, host list or selector error
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<HostgenExitCode> for ExitCode {
    fn from(code: HostgenExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl HostgenExitCode {
    /// Classify a failed run
    fn for_error(err: &anyhow::Error) -> Self {
        let core = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<hostgen_core::Error>());

        match core {
            Some(e) if e.is_input_error() => HostgenExitCode::ConfigError,
            _ => HostgenExitCode::RuntimeError,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "hostgen")]
#[command(version, about = "Generates dnsmasq and zone configs")]
struct Cli {
    /// Config file
    #[arg(value_name = "CONFIG")]
    config_path: Option<PathBuf>,

    /// Config file (alternative to the positional argument)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        env = "HOSTGEN_CONFIG"
    )]
    config_flag: Option<PathBuf>,

    /// Write output to FILE instead of stdout (replaced atomically)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Read networks from a JSON snapshot instead of live interfaces
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Only consider live interfaces matching this name or glob
    #[arg(long, value_name = "GLOB", conflicts_with = "snapshot")]
    interfaces: Option<String>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Generates dnsmasq hosts
    Dnsmasq,
    /// Generates zone entries
    Zone,
    /// Generates shell variable assignments
    Env,
}

impl Mode {
    /// Writer registry name
    fn name(self) -> &'static str {
        match self {
            Mode::Dnsmasq => "dnsmasq",
            Mode::Zone => "zone",
            Mode::Env => "env",
        }
    }
}

impl Cli {
    /// Configuration file to load
    fn config(&self) -> PathBuf {
        self.config_path
            .clone()
            .or_else(|| self.config_flag.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG))
    }
}

/// Parse `HOSTGEN_LOG_LEVEL`
fn log_level(value: Option<&str>) -> Result<Level> {
    match value.map(|v| v.trim().to_lowercase()).as_deref() {
        None | Some("") => Ok(Level::WARN),
        Some("trace") => Ok(Level::TRACE),
        Some("debug") => Ok(Level::DEBUG),
        Some("info") => Ok(Level::INFO),
        Some("warn") => Ok(Level::WARN),
        Some("error") => Ok(Level::ERROR),
        Some(other) => anyhow::bail!(
            "HOSTGEN_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            other
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match log_level(std::env::var("HOSTGEN_LOG_LEVEL").ok().as_deref()) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return HostgenExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return HostgenExitCode::RuntimeError.into();
    }

    match run(&cli) {
        Ok(()) => HostgenExitCode::Success.into(),
        Err(e) => {
            error!("{:#}", e);
            HostgenExitCode::for_error(&e).into()
        }
    }
}

/// Run one generation
fn run(cli: &Cli) -> Result<()> {
    let mut registry = WriterRegistry::new();
    hostgen_writers::register(&mut registry);
    let writer = registry.writer(cli.mode.name())?;

    let config_path = cli.config();
    let config = HostConfig::from_path(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    info!(
        "Loaded {} selector(s) from {}",
        config.len(),
        config_path.display()
    );

    let engine = HostgenEngine::new(network_source(cli)?);
    debug!("Using {} network source", engine.source_name());

    let records = engine.generate(&config)?;

    // Render fully before touching the destination
    let rendered = writer.render(&records)?;

    match &cli.output {
        Some(path) => write_atomically(path, rendered.as_bytes())
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            out.write_all(rendered.as_bytes())?;
            out.flush()?;
        }
    }

    info!(
        "Wrote {} {} record(s)",
        match cli.mode {
            Mode::Dnsmasq => records.reservations.len(),
            Mode::Zone | Mode::Env => records.zone.len(),
        },
        cli.mode.name()
    );

    Ok(())
}

/// Choose the network source for this run
fn network_source(cli: &Cli) -> Result<Box<dyn NetworkSource>> {
    if let Some(path) = &cli.snapshot {
        return Ok(Box::new(FileNetworkSource::new(path)));
    }

    #[cfg(feature = "pnet")]
    {
        let mut source = hostgen_net_pnet::PnetNetworkSource::new();
        if let Some(pattern) = &cli.interfaces {
            source = source.with_interface_filter(pattern.clone());
        }
        Ok(Box::new(source))
    }

    #[cfg(not(feature = "pnet"))]
    {
        Err(hostgen_core::Error::config(
            "built without live interface support; pass --snapshot FILE",
        )
        .into())
    }
}

/// Write `content` to `path` via a temporary file in the same directory
///
/// Readers of `path` see either the old or the new content, never a
/// partial file.
fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
