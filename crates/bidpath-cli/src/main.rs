mod display;
mod io;
mod run;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};

use bidpath_ai::config::{DEFAULT_MAX_INPUT_CHARS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use bidpath_ai::{GatewayConfig, GenerationFailure, OpenAiBackend, Pipeline};
use bidpath_core::{
    CompanyProfile, CoverageGaps, DEFAULT_WORDS_PER_PAGE, ParsedSolicitation,
    eligibility_warnings, estimate_pages_with, normalize_assessment, normalize_parsed,
    normalize_score,
};

#[derive(Parser)]
#[command(
    name = "bidpath",
    version,
    about = "Parse, assess, draft, and score government solicitations"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Model identifier sent to the backend.
    #[arg(long, global = true, env = "BIDPATH_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// API credential.
    #[arg(long, global = true, env = "BIDPATH_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Credential used when --api-key is not set.
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// OpenAI-compatible endpoint, e.g. http://localhost:8080/v1.
    #[arg(long, global = true, env = "BIDPATH_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, global = true, env = "BIDPATH_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Solicitation text beyond this many characters is dropped.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_INPUT_CHARS)]
    max_input_chars: usize,

    /// Apply the normalization pass to stage outputs.
    #[arg(long, global = true)]
    normalize: bool,

    /// Print a human-readable card instead of JSON.
    #[arg(long, global = true)]
    pretty: bool,

    /// Write JSON output to a file instead of stdout.
    #[arg(long, global = true)]
    out: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract structured fields from solicitation text.
    Parse {
        #[arg(long)]
        input: PathBuf,
    },
    /// Assess eligibility and fit for a company.
    Assess {
        #[arg(long)]
        parsed: PathBuf,
        #[arg(long)]
        company: PathBuf,
    },
    /// Draft proposal sections.
    Generate {
        #[arg(long)]
        parsed: PathBuf,
        #[arg(long)]
        company: PathBuf,
    },
    /// Score a draft against the solicitation requirements.
    Score {
        #[arg(long)]
        parsed: PathBuf,
        /// Draft object or bare section array.
        #[arg(long)]
        draft: PathBuf,
    },
    /// Parse, then assess and generate, then score.
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        company: PathBuf,
    },
    /// Estimate page count locally (no backend call).
    Pages {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = DEFAULT_WORDS_PER_PAGE)]
        words_per_page: usize,
    },
}

#[derive(Serialize)]
struct PageEstimate {
    words: usize,
    words_per_page: usize,
    estimated_pages: u32,
}

impl Cli {
    fn gateway_config(&self) -> GatewayConfig {
        let mut config = GatewayConfig::default()
            .with_model(self.model.clone())
            .with_temperature(self.temperature);
        config.max_input_chars = self.max_input_chars;
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(key) = self.api_key.as_ref().or(self.openai_api_key.as_ref()) {
            config = config.with_api_key(key.clone());
        }
        config
    }

    fn pipeline(&self) -> Pipeline {
        let config = self.gateway_config();
        info!(?config, "gateway configured");
        Pipeline::new(Arc::new(OpenAiBackend::new(&config)), config)
    }

    fn emit<T: Serialize>(&self, value: &T, card: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.pretty {
            print!("{}", card(value));
            if self.out.is_none() {
                return Ok(());
            }
        }
        io::write_json(value, self.out.as_deref())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("bidpath v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Command::Parse { input } => {
            let text = io::read_text(input)?;
            let mut parsed = cli.pipeline().parse(&text).await.map_err(log_failure)?;
            if cli.normalize {
                log_adjustments(&normalize_parsed(&mut parsed));
            }
            cli.emit(&parsed, display::parsed_card)
        }
        Command::Assess { parsed, company } => {
            let (parsed, company) = load_inputs(parsed, company)?;
            let mut assessment = cli
                .pipeline()
                .assess(&parsed, &company)
                .await
                .map_err(log_failure)?;
            if cli.normalize {
                log_adjustments(&normalize_assessment(&mut assessment));
            }
            let warnings = eligibility_warnings(&parsed, &company);
            for warning in &warnings {
                warn!(%warning, "eligibility");
            }
            let company_percent = company.completion_percent();
            cli.emit(&assessment, |a| {
                display::assessment_card(a, company_percent, &warnings)
            })
        }
        Command::Generate { parsed, company } => {
            let (parsed, company) = load_inputs(parsed, company)?;
            let draft = cli
                .pipeline()
                .generate(&parsed, &company)
                .await
                .map_err(log_failure)?;
            cli.emit(&draft, display::draft_card)
        }
        Command::Score { parsed, draft } => {
            let parsed: ParsedSolicitation = io::read_json(parsed)?;
            let sections = io::read_sections(draft)?;
            let mut score = cli
                .pipeline()
                .score(&parsed, &sections)
                .await
                .map_err(log_failure)?;
            if cli.normalize {
                log_adjustments(&normalize_score(&mut score));
            }
            let gaps = CoverageGaps::analyze(&parsed, &sections);
            cli.emit(&score, |s| display::score_card(s, Some(&gaps)))
        }
        Command::Run { input, company } => {
            let text = io::read_text(input)?;
            let company: CompanyProfile = io::read_json(company)?;
            let report = run::run(&cli.pipeline(), &text, &company, cli.normalize)
                .await
                .map_err(log_failure)?;
            cli.emit(&report, |r| {
                [
                    display::parsed_card(&r.parsed),
                    display::assessment_card(
                        &r.assessment,
                        r.progress.company_percent,
                        &r.eligibility_warnings,
                    ),
                    display::draft_card(&r.draft),
                    display::score_card(&r.score, Some(&r.gaps)),
                ]
                .join("\n")
            })
        }
        Command::Pages {
            input,
            words_per_page,
        } => {
            let text = io::read_page_source(input)?;
            let estimate = PageEstimate {
                words: text.split_whitespace().count(),
                words_per_page: *words_per_page,
                estimated_pages: estimate_pages_with(&text, *words_per_page),
            };
            cli.emit(&estimate, |e| {
                format!(
                    "{} words at {} per page: {} page(s)\n",
                    e.words, e.words_per_page, e.estimated_pages
                )
            })
        }
    }
}

fn load_inputs(parsed: &Path, company: &Path) -> anyhow::Result<(ParsedSolicitation, CompanyProfile)> {
    let parsed = io::read_json(parsed)?;
    let company = io::read_json(company).context("company profile must be a JSON object")?;
    Ok((parsed, company))
}

/// Log backend text that failed to parse, then hand the failure to anyhow.
fn log_failure(failure: GenerationFailure) -> anyhow::Error {
    if let Some(raw) = failure.raw_text() {
        error!(raw_len = raw.len(), raw = %raw, "unusable backend output");
    }
    anyhow::Error::new(failure)
}

fn log_adjustments(adjustments: &[bidpath_core::Adjustment]) {
    for adjustment in adjustments {
        info!(?adjustment, "normalized");
    }
}
