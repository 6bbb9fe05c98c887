// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug};
use std::io::Write;
use std::path::{Path, PathBuf};

use yacat::app_config::{Config, LogLevel, TranslationProvider};
use yacat::{CatalogFormat, Controller, TranslationJob, TranslationSummary};

/// Configuration file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "yacat.json";

/// Exit status after Ctrl-C, as a shell reports SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a gettext .po catalog
    Po(CatalogArgs),

    /// Translate a Transifex JSON file
    Json(CatalogArgs),

    /// Translate a catalog, detecting the format from the input extension
    Translate(CatalogArgs),

    /// Generate shell completions for yacat
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct CatalogArgs {
    /// Catalog to translate
    #[arg(short, long, value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the translated catalog
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Translate without writing the output file
    #[arg(long)]
    dry_run: bool,

    /// Report every entry and checkpoint
    #[arg(short, long)]
    verbose: bool,

    /// Save the cache every N entries in verbose mode (default: 50)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    checkpoint_every: Option<u64>,

    /// Continue from an existing output file
    #[arg(long)]
    resume: bool,

    /// Persistent translation cache (JSON)
    #[arg(long, value_name = "PATH")]
    cache_file: Option<PathBuf>,

    /// Skip entries that already have a translation (default)
    #[arg(long, overrides_with = "no_skip_translated")]
    skip_translated: bool,

    /// Re-translate entries that already have a translation
    #[arg(long, overrides_with = "skip_translated")]
    no_skip_translated: bool,

    /// Source language code (e.g., 'en')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name (Ollama)
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// yacat - Yet Another Catalog Auto-Translator
///
/// Machine-translates gettext .po catalogs and Transifex JSON files while keeping
/// placeholders, newlines and surrounding whitespace intact.
#[derive(Parser, Debug)]
#[command(name = "yacat")]
#[command(version)]
#[command(about = "Placeholder-safe machine translation of localization catalogs")]
#[command(long_about = "yacat translates gettext .po catalogs and Transifex JSON files through a translation backend.

EXAMPLES:
    yacat po -i locale/messages.pot -o locale/fr.po          # Translate a gettext catalog
    yacat json -i en.json -o fr.json -v                      # Transifex JSON with per-entry output
    yacat translate -i en.json -o fr.json --resume           # Detect the format, resume a run
    yacat po -i app.po -o fr.po --cache-file .yacat-cache.json
    yacat po -i app.po -o de.po -t de -p ollama -m mistral   # Another language and backend
    yacat completions bash > yacat.bash                      # Generate bash completions

CONFIGURATION:
    Settings are read from yacat.json in the working directory, or from the
    file given with --config. Command line options override file values.

SUPPORTED PROVIDERS:
    google - Google Translate web endpoint (default)
    ollama - Local Ollama server")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything; log::max_level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    if let Err(e) = CustomLogger::init(LevelFilter::Info) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let cli = CommandLineOptions::parse();

    let exit_code = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yacat", &mut std::io::stdout());
            0
        }
        Commands::Po(args) => execute(args, Some(CatalogFormat::Po)).await,
        Commands::Json(args) => execute(args, Some(CatalogFormat::Transifex)).await,
        Commands::Translate(args) => execute(args, None).await,
    };

    log::logger().flush();
    std::process::exit(exit_code);
}

/// Run one catalog job, racing it against Ctrl-C, and map the outcome to an exit status
async fn execute(args: CatalogArgs, format: Option<CatalogFormat>) -> i32 {
    tokio::select! {
        result = run_translate(args, format) => match result {
            Ok(summary) => {
                println!("Completed: {}/{} entries translated", summary.translated, summary.total);
                0
            }
            Err(e) => {
                eprintln!("Error: {:#}", e);
                1
            }
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!(
                "\n[INTERRUPTED] Translations up to the last checkpoint are kept in the cache."
            );
            eprintln!("Use --resume next run to continue from where you left off.");
            INTERRUPTED_EXIT_CODE
        }
    }
}

/// Load the configuration from an explicit path, else `yacat.json`, else defaults
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Config::from_file(DEFAULT_CONFIG_FILE),
        None => {
            debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
            Ok(Config::default())
        }
    }
}

async fn run_translate(
    options: CatalogArgs,
    format: Option<CatalogFormat>,
) -> Result<TranslationSummary> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_config(options.config.as_deref())?;

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.set_model(model.clone());
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(every) = options.checkpoint_every {
        config.handler.checkpoint_every = every as usize;
    }
    if let Some(cache_file) = &options.cache_file {
        config.handler.cache_file = Some(cache_file.clone());
    }
    if options.no_skip_translated {
        config.handler.skip_translated = false;
    } else if options.skip_translated {
        config.handler.skip_translated = true;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }
    // Verbose reporting goes through info!
    if options.verbose && log::max_level() < LevelFilter::Info {
        log::set_max_level(LevelFilter::Info);
    }

    let controller = Controller::with_config(config)?;
    let job = TranslationJob {
        input: options.input,
        output: options.output,
        format,
        dry_run: options.dry_run,
        resume: options.resume,
        verbose: options.verbose,
    };

    Ok(controller.run(job).await?)
}
