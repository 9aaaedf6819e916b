mod config;
mod interactive;
mod metrics;
mod prepare;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use transcript::{ExhaustionPolicy, Language};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "nerqa", version, about = "NER-as-QA transcript preparation and inference")]
struct Cli {
    /// JSON config file; command line flags take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Prompt language: ru or en
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert raw NER records (JSONL) into conversation transcripts (JSONL)
    Prepare {
        /// Path to the input file, JSONL format
        input_file_path: PathBuf,
        /// Path to the output file, JSONL format
        output_file_path: PathBuf,
        /// Use negative sampling
        #[arg(long)]
        ns: bool,
        /// Probability of adding a negative question to a record
        #[arg(long)]
        ns_prob: Option<f64>,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
        /// Number of most frequent entity types to report
        #[arg(long)]
        top_k: Option<usize>,
        /// Skip the negative question instead of failing when no unused type is left
        #[arg(long)]
        skip_exhausted: bool,
    },
    /// Interactively ask the model for entities in a text
    Serve {
        /// Generation service base URL
        #[arg(long)]
        base_url: Option<String>,
        /// Model name
        #[arg(long)]
        model: Option<String>,
        /// Maximum number of generated tokens
        #[arg(long)]
        max_new_tokens: Option<u32>,
        /// Print the rendered prompt before each answer
        #[arg(long)]
        show_prompt: bool,
    },
    /// Print the rendered inference prompt for one text and entity type
    Prompt {
        text: String,
        entity_type: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(lang) = &cli.lang {
        config.language = lang.parse::<Language>()?;
    }
    let language = config.language;

    match cli.cmd {
        Command::Prepare {
            input_file_path,
            output_file_path,
            ns,
            ns_prob,
            seed,
            top_k,
            skip_exhausted,
        } => {
            let mut prepare_config = config.prepare;
            prepare_config.negative_sampling |= ns;
            if let Some(p) = ns_prob {
                prepare_config.negative_probability = p;
            }
            if seed.is_some() {
                prepare_config.seed = seed;
            }
            if let Some(k) = top_k {
                prepare_config.top_k = k;
            }
            if skip_exhausted {
                prepare_config.on_exhausted = ExhaustionPolicy::Skip;
            }

            prepare::run(&input_file_path, &output_file_path, language, &prepare_config)
                .await
                .context("prepare failed")?;
        }
        Command::Serve {
            base_url,
            model,
            max_new_tokens,
            show_prompt,
        } => {
            let mut inference = config.inference;
            if let Some(url) = base_url {
                inference.base_url = url;
            }
            if let Some(model) = model {
                inference.model = model;
            }
            if let Some(n) = max_new_tokens {
                inference.max_new_tokens = n;
            }

            let inferencer = serve::Inferencer::new(
                serve::OllamaClient::new(inference.base_url, inference.model),
                serve::RetryPolicy::from_config(&inference.retry),
                language.prompts(),
                inference.max_new_tokens,
            );

            let stdin = BufReader::new(tokio::io::stdin());
            interactive::run(&inferencer, stdin, tokio::io::stdout(), show_prompt).await?;
        }
        Command::Prompt { text, entity_type } => {
            let prompts = language.prompts();
            let transcript = transcript::inference_transcript(&text, &entity_type, &prompts);
            let prompt = serve::render_prompt(&transcript, &prompts.template_name)?;
            println!("{}", prompt);
        }
    }

    Ok(())
}
