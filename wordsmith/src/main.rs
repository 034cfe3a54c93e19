//! wordsmith - summarize text or PDFs at a target ratio, or correct grammar

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use llm_client::{Config, ModelPreset};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use wordsmith::capability::{Backend, BackendKind};
use wordsmith::config::WordsmithConfig;
use wordsmith::{GrammarCorrector, Summarizer, TargetRatio, pdf};

/// Program name used for per-program llm-client defaults
const PROGRAM: &str = "wordsmith";

#[derive(Parser, Debug)]
#[command(
    name = "wordsmith",
    about = "Summarize text or PDFs, or correct grammar, using hosted models",
    long_about = "Summarizes text or PDF documents at a target retention ratio, chunking long \
inputs and re-summarizing the result, or rewrites text with corrected grammar"
)]
#[command(version)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    /// Capability backend (overrides config)
    #[arg(short, long, global = true, value_enum)]
    backend: Option<BackendKind>,

    /// Model preset for the llm backend (overrides config)
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize text or a PDF
    Summarize {
        /// Text to summarize (reads stdin when omitted)
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, conflicts_with_all = ["text", "pdf"])]
        file: Option<PathBuf>,

        /// Summarize the text of a PDF document
        #[arg(long, conflicts_with = "text")]
        pdf: Option<PathBuf>,

        /// Summary retention ratio in percent, 10-50 (default from config)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(10..=50))]
        ratio: Option<u8>,

        /// Do not re-summarize the combined chunk summaries
        #[arg(long)]
        no_recombine: bool,

        /// Return the combined chunk summaries if re-summarization fails
        #[arg(long)]
        keep_partial: bool,

        /// Print the full summary report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Correct the grammar of text
    Grammar {
        /// Text to correct (reads stdin when omitted)
        text: Option<String>,

        /// Read the text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// List available llm presets
    List,
    /// Set the default llm preset
    SetDefault {
        /// Name of the preset to use as default
        preset: String,
    },
    /// Add a new llm preset
    AddPreset {
        /// Preset name
        name: String,
        /// Provider (anthropic, openrouter, cerebras, ollama)
        #[arg(short, long)]
        provider: String,
        /// Model identifier
        #[arg(short = 'M', long)]
        model_id: String,
    },
    /// Set the default capability backend
    SetBackend {
        #[arg(value_enum)]
        kind: BackendKind,
    },
}

/// Handle config subcommands
fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = WordsmithConfig::load()?;
            println!("Config file: {}", WordsmithConfig::config_path()?.display());
            println!();
            println!("{:#?}", config);
            println!();

            let llm_config = Config::load()?;
            println!("LLM config file: {}", Config::config_path()?.display());
            println!();
            println!("{:#?}", llm_config);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let current_default = config.get_default_for_program(PROGRAM);
            println!("Available presets:");
            let mut names: Vec<&String> = config.presets.keys().collect();
            names.sort();
            for name in names {
                let preset = &config.presets[name];
                let default_marker = if name == current_default {
                    " (default)"
                } else {
                    ""
                };
                println!(
                    "  {} - {} / {}{}",
                    name, preset.provider, preset.model, default_marker
                );
            }
        }
        ConfigAction::SetDefault { preset } => {
            let mut config = Config::load()?;
            // Verify preset exists
            config.get_preset(preset)?;
            config.defaults.insert(PROGRAM.to_string(), preset.clone());
            config.save()?;
            println!("Default preset for {} set to: {}", PROGRAM, preset);
        }
        ConfigAction::AddPreset {
            name,
            provider,
            model_id,
        } => {
            llm_client::ProviderKind::from_str(provider)?;
            let mut config = Config::load()?;
            config
                .presets
                .insert(name.clone(), ModelPreset::new(provider, model_id));
            config.save()?;
            println!("Added preset: {}", name);
        }
        ConfigAction::SetBackend { kind } => {
            let mut config = WordsmithConfig::load()?;
            config.backend = *kind;
            config.save()?;
            println!("Default backend set to: {:?}", kind);
        }
    }
    Ok(())
}

/// Read input text from the argument, a file, or piped stdin
fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("No input given. Pass TEXT, --file, or pipe text on stdin.");
    }

    let mut input = String::new();
    stdin
        .read_to_string(&mut input)
        .context("Failed to read stdin")?;
    Ok(input)
}

fn init_logging(debug: bool) {
    let default_filter = if debug {
        "warn,wordsmith=debug,llm_client=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    // Handle config subcommands first (before backend initialization)
    if let Commands::Config { action } = &args.command {
        return handle_config_command(action);
    }

    let config = WordsmithConfig::load().context("Failed to load wordsmith configuration")?;
    let kind = args.backend.unwrap_or(config.backend);

    match args.command {
        Commands::Summarize {
            text,
            file,
            pdf,
            ratio,
            no_recombine,
            keep_partial,
            json,
        } => {
            let ratio = match ratio {
                Some(percent) => TargetRatio::from_percent(percent)?,
                None => config.default_ratio()?,
            };

            let input = match &pdf {
                Some(path) => pdf::extract_text_from_path(path)?,
                None => read_input(text, file.as_deref())?,
            };

            let backend = Backend::create(kind, &config, args.model.as_deref())
                .context("Failed to initialize summarization backend")?;
            let options = config
                .summarizer
                .options()
                .with_recombine(!no_recombine)
                .with_keep_combined_on_failure(
                    keep_partial || config.summarizer.keep_combined_on_failure,
                );
            let summarizer = Summarizer::new(backend.summarization(), options);

            let report = summarizer.summarize(&input, ratio).await?;

            if report.failed_chunks() > 0 {
                log::warn!(
                    "{} of {} chunk(s) failed to summarize",
                    report.failed_chunks(),
                    report.chunks.len()
                );
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.summary);
            }
        }
        Commands::Grammar { text, file } => {
            let input = read_input(text, file.as_deref())?;

            let backend = Backend::create(kind, &config, args.model.as_deref())
                .context("Failed to initialize grammar backend")?;
            let corrector = GrammarCorrector::new(backend.correction(), config.grammar.generation())
                .with_prefix(config.grammar.prefix.clone());

            let corrected = corrector.correct(&input).await?;
            println!("{}", corrected);
        }
        Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}
