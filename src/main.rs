//! Hamster configuration CLI
//!
//! Entry point for the `hamster-config` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use hamster_config::config::{get_path, overrides_to_tree};
use hamster_config::{
    migrate_config_file, BaseWins, ConfigError, ConflictResolver, EffectiveConfig, Format,
    HamsterConfiguration, LegacySettings, OverlayWins, RejectConflicts,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hamster-config")]
#[command(about = "Inspect, merge and migrate Hamster keyboard configuration", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a configuration file and report its sections
    Validate {
        /// Configuration file (YAML, JSON or TOML)
        file: PathBuf,
    },

    /// Deep merge an overlay configuration onto a base configuration
    Merge {
        base: PathBuf,
        overlay: PathBuf,

        /// How to resolve a key set to different values on both sides
        #[arg(long, value_enum, default_value_t = Policy::Overlay)]
        policy: Policy,

        /// Output format (default: from --output, else the base file)
        #[arg(long)]
        format: Option<Format>,

        /// Write the result here instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration after all layers are merged
    Effective {
        /// Application config (default: ./Hamster.yaml)
        #[arg(long)]
        app: Option<PathBuf>,

        /// User patch (default: ./hamster.custom.yaml)
        #[arg(long)]
        custom: Option<PathBuf>,

        /// Override a value, e.g. --set toolbar.heightOfToolbar=60
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Output format for the configuration
        #[arg(long)]
        format: Option<Format>,

        /// Output the effective config with provenance as JSON
        #[arg(long, conflicts_with = "format")]
        json: bool,
    },

    /// Print the value at a dotted path
    Get {
        file: PathBuf,

        /// e.g. keyboard.enableColorSchema or swipe.keyboardSwipe.0.keyboardType
        path: String,
    },

    /// Migrate a 1.0 preferences snapshot into a configuration file
    Migrate {
        /// Legacy snapshot (JSON by default)
        #[arg(long)]
        legacy: PathBuf,

        /// Configuration to migrate into (default: ./Hamster.yaml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Write the migrated configuration here instead of updating --config
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Overlay value replaces the base value
    Overlay,
    /// Base value is kept
    Base,
    /// Differing values are an error
    Strict,
}

impl Policy {
    fn resolver(self) -> Box<dyn ConflictResolver> {
        match self {
            Policy::Overlay => Box::new(OverlayWins),
            Policy::Base => Box::new(BaseWins),
            Policy::Strict => Box::new(RejectConflicts),
        }
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file } => run_validate(&file),
        Commands::Merge {
            base,
            overlay,
            policy,
            format,
            output,
        } => run_merge(&base, &overlay, policy, format, output.as_deref()),
        Commands::Effective {
            app,
            custom,
            set,
            format,
            json,
        } => run_effective(app, custom, &set, format, json),
        Commands::Get { file, path } => run_get(&file, &path),
        Commands::Migrate {
            legacy,
            config,
            output,
        } => run_migrate(&legacy, config, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("HAMSTER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(file: &Path) -> Result<(), ConfigError> {
    let config = HamsterConfiguration::from_file(file)?;

    println!("Configuration valid: {}", file.display());
    let sections = config.sections();
    if sections.is_empty() {
        println!("  (no sections set)");
    } else {
        println!("  Sections: {}", sections.join(", "));
    }
    if let Some(ref keyboards) = config.keyboards {
        println!("  Custom keyboards: {}", keyboards.len());
    }
    Ok(())
}

fn run_merge(
    base_path: &Path,
    overlay_path: &Path,
    policy: Policy,
    format: Option<Format>,
    output: Option<&Path>,
) -> Result<(), ConfigError> {
    let base = HamsterConfiguration::from_file(base_path)?;
    let overlay = HamsterConfiguration::from_file(overlay_path)?;

    let resolver = policy.resolver();
    let merged = base.merge(&overlay, &*resolver)?;

    let format = format
        .or_else(|| output.and_then(Format::from_path))
        .or_else(|| Format::from_path(base_path))
        .unwrap_or_default();
    let text = merged.serialize(format)?;

    write_or_print(output, &text)
}

fn run_effective(
    app: Option<PathBuf>,
    custom: Option<PathBuf>,
    set: &[String],
    format: Option<Format>,
    json: bool,
) -> Result<(), ConfigError> {
    let app = app.unwrap_or_else(|| PathBuf::from(hamster_config::config::APP_CONFIG_FILE));
    let custom =
        custom.unwrap_or_else(|| PathBuf::from(hamster_config::config::CUSTOM_CONFIG_FILE));

    let overrides = if set.is_empty() {
        None
    } else {
        Some(overrides_to_tree(set)?)
    };

    let effective = EffectiveConfig::build(Some(&app), Some(&custom), overrides)?;

    if json {
        let text = effective
            .to_json()
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;
        println!("{}", text);
    } else {
        for source in &effective.sources {
            tracing::info!(origin = ?source.origin, path = ?source.path, "layer");
        }
        print!("{}", effective.configuration().serialize(format.unwrap_or_default())?);
    }
    Ok(())
}

fn run_get(file: &Path, path: &str) -> Result<(), ConfigError> {
    let tree = HamsterConfiguration::from_file(file)?.to_tree()?;

    match get_path(&tree, path) {
        Some(serde_json::Value::String(s)) => println!("{}", s),
        Some(value) => println!("{}", value),
        None => {
            eprintln!("No value at '{}' in {}", path, file.display());
            process::exit(1);
        }
    }
    Ok(())
}

fn run_migrate(
    legacy_path: &Path,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(), ConfigError> {
    let legacy = LegacySettings::from_file(legacy_path)?;
    let config_path =
        config_path.unwrap_or_else(|| PathBuf::from(hamster_config::config::APP_CONFIG_FILE));

    let outcome = migrate_config_file(&legacy, &config_path, output.as_deref())?;
    let report = &outcome.report;

    if report.is_empty() {
        println!("Nothing to migrate.");
    } else {
        println!("Migrated {} setting(s):", report.applied.len());
        for path in &report.applied {
            println!("  {}", path);
        }
        if report.swipe_keys > 0 {
            println!("  ({} swipe key(s) on the Chinese keyboard)", report.swipe_keys);
        }
    }

    match outcome.written {
        Some(path) => println!("Wrote: {}", path.display()),
        None if !report.is_empty() => println!("Configuration already up to date."),
        None => {}
    }
    Ok(())
}

fn write_or_print(output: Option<&Path>, text: &str) -> Result<(), ConfigError> {
    match output {
        Some(path) => {
            fs::write(path, text)
                .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
            eprintln!("Wrote: {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}
