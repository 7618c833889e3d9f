//! Stage handlers: each builds its prompt, makes one gateway call, and
//! post-processes the typed result.
//!
//! Handlers hold no state between calls. Everything a stage needs arrives
//! as an argument.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use bidpath_core::heuristics::{normalize_whitespace, solicitation_set_asides, truncate_chars};
use bidpath_core::{
    AssessmentResult, CompanyProfile, CoverageGaps, Draft, DraftSection, ParsedSolicitation,
    ScoreReport, estimate_pages, joined_content,
};

use crate::error::GenerationFailure;
use crate::gateway::Gateway;
use crate::prompts::{self, compose};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Parse,
    Assess,
    Generate,
    Score,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Assess => "assess",
            Self::Generate => "generate",
            Self::Score => "score",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, GenerationFailure> {
    serde_json::to_string_pretty(value).map_err(GenerationFailure::Payload)
}

/// Extract a [`ParsedSolicitation`] from raw solicitation text.
pub async fn parse(gateway: &Gateway, text: &str) -> Result<ParsedSolicitation, GenerationFailure> {
    let config = gateway.config();
    let normalized = normalize_whitespace(text);
    let prepared = truncate_chars(&normalized, config.max_input_chars);
    if prepared.len() < normalized.len() {
        info!(
            kept_chars = config.max_input_chars,
            "solicitation text truncated for prompt"
        );
    }

    let prompt = compose(
        prompts::PARSE_INSTRUCTION,
        prompts::PARSE_SCHEMA,
        &[("SOLICITATION TEXT", prepared)],
    );
    let parsed: ParsedSolicitation = gateway
        .invoke_as(Stage::Parse, &prompt, config.temperature)
        .await?;

    info!(
        requirements = parsed.requirements.len(),
        criteria = parsed.evaluation_criteria.len(),
        questions = parsed.questions_for_user.len(),
        "parsed solicitation"
    );
    Ok(parsed)
}

/// Assess eligibility and fit for `company`.
///
/// The set-aside rule (an unqualified bidder gets a 0% win probability) is
/// stated in the prompt, with locally detected set-aside keywords as hints.
/// It is not checked on the result.
pub async fn assess(
    gateway: &Gateway,
    parsed: &ParsedSolicitation,
    company: &CompanyProfile,
) -> Result<AssessmentResult, GenerationFailure> {
    let set_asides = solicitation_set_asides(parsed);
    let certifications = company.certifications();
    let hints = format!(
        "Set-aside keywords found in the solicitation: {}\nCertifications listed by the company: {}",
        list_or_none(set_asides.iter().copied()),
        list_or_none(certifications.iter().map(String::as_str)),
    );

    let parsed_json = to_json(parsed)?;
    let company_json = to_json(company)?;
    let prompt = compose(
        prompts::ASSESS_INSTRUCTION,
        prompts::ASSESS_SCHEMA,
        &[
            ("PARSED SOLICITATION", parsed_json.as_str()),
            ("COMPANY", company_json.as_str()),
            ("ELIGIBILITY HINTS", hints.as_str()),
        ],
    );
    let assessment: AssessmentResult = gateway
        .invoke_as(Stage::Assess, &prompt, gateway.config().temperature)
        .await?;

    info!(
        eligibility = ?assessment.eligibility.status,
        go_no_go = assessment.compatibility.go_no_go.as_str(),
        win_percent = assessment.compatibility.probability_of_win_percent,
        "assessed solicitation"
    );
    Ok(assessment)
}

/// Draft proposal sections grounded in the solicitation and company data.
pub async fn generate(
    gateway: &Gateway,
    parsed: &ParsedSolicitation,
    company: &CompanyProfile,
) -> Result<Draft, GenerationFailure> {
    let parsed_json = to_json(parsed)?;
    let company_json = to_json(company)?;
    let prompt = compose(
        prompts::GENERATE_INSTRUCTION,
        prompts::GENERATE_SCHEMA,
        &[
            ("PARSED SOLICITATION", parsed_json.as_str()),
            ("COMPANY", company_json.as_str()),
        ],
    );
    let draft: Draft = gateway
        .invoke_as(Stage::Generate, &prompt, gateway.config().temperature)
        .await?;

    info!(sections = draft.sections.len(), "generated draft");
    Ok(draft)
}

/// Score `sections` against `parsed` and attach the local page estimate.
///
/// `format.estimated_pages` is always the local estimate of the newline-joined
/// section contents; whatever the backend put there is discarded.
pub async fn score(
    gateway: &Gateway,
    parsed: &ParsedSolicitation,
    sections: &[DraftSection],
) -> Result<ScoreReport, GenerationFailure> {
    let estimated_pages = estimate_pages(&joined_content(sections));
    let gaps = CoverageGaps::analyze(parsed, sections);

    let requirements_json = to_json(&parsed.requirements)?;
    let sections_json = to_json(sections)?;
    let gaps_json = to_json(&gaps)?;
    let prompt = compose(
        prompts::SCORE_INSTRUCTION,
        prompts::SCORE_SCHEMA,
        &[
            ("REQUIREMENTS", requirements_json.as_str()),
            ("PROPOSAL SECTIONS", sections_json.as_str()),
            ("LOCAL COVERAGE GAPS", gaps_json.as_str()),
        ],
    );
    let mut report: ScoreReport = gateway
        .invoke_as(Stage::Score, &prompt, gateway.config().temperature)
        .await?;

    if report.format.estimated_pages != estimated_pages {
        warn!(
            backend_pages = report.format.estimated_pages,
            local_pages = estimated_pages,
            "replacing backend page estimate"
        );
    }
    report.format.estimated_pages = estimated_pages;

    info!(
        score_percent = report.overall.score_percent,
        rtm_entries = report.rtm.len(),
        uncovered = gaps.uncovered.len(),
        estimated_pages,
        "scored draft"
    );
    Ok(report)
}

fn list_or_none<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let joined = items.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}
