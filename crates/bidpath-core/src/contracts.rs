//! Stage payload contracts shared by every pipeline stage.
//!
//! Each struct mirrors the JSON the generation backend is asked to emit. The
//! backend is trusted for shape only, so deserialization tolerates `null` in
//! list and text positions and "unknown" in numeric ones. An unknown
//! percentage reads as NaN; domain rules (unique ids, percentage bounds)
//! live in [`crate::normalize`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ── Parse stage ──

/// Structured extraction of a solicitation document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSolicitation {
    #[serde(default, deserialize_with = "de::null_default")]
    pub metadata: SolicitationMetadata,
    #[serde(default, deserialize_with = "de::null_default")]
    pub scope_summary: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub requirements: Vec<Requirement>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub evaluation_criteria: Vec<EvaluationCriterion>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub format_constraints: FormatConstraints,
    #[serde(default, deserialize_with = "de::null_default")]
    pub questions_for_user: Vec<String>,
}

impl ParsedSolicitation {
    /// Look up a requirement by id.
    pub fn requirement(&self, id: &str) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id == id)
    }
}

/// Solicitation header fields. Every field is nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolicitationMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub agency: Option<String>,
    #[serde(default)]
    pub solicitation_number: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub set_aside: Option<String>,
    #[serde(default)]
    pub naics: Option<String>,
}

/// A single requirement extracted from the solicitation.
///
/// Downstream RTM entries and draft sections refer to it by `id` only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub text: String,
    pub priority: Priority,
    #[serde(default, deserialize_with = "de::null_default")]
    pub suggested_sections: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[serde(alias = "must", alias = "Must")]
    Must,
    #[serde(alias = "should", alias = "Should")]
    Should,
    #[serde(alias = "may", alias = "May")]
    May,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Must => "MUST",
            Self::Should => "SHOULD",
            Self::May => "MAY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCriterion {
    pub factor: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub text: String,
}

/// Formatting limits stated by the solicitation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatConstraints {
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub max_pages_total: Option<u32>,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_f64")]
    pub font_size_pt: Option<f64>,
}

// ── Company profile ──

/// Bidder capabilities supplied by the caller.
///
/// Free-form and opaque to the pipeline: it is serialized into prompts as-is
/// and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyProfile(pub Map<String, Value>);

impl CompanyProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Certifications listed under `certifications`, either as an array of
    /// strings or a comma-separated string.
    pub fn certifications(&self) -> Vec<String> {
        match self.0.get("certifications") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }
}

// ── Assess stage ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub contract_brief: ContractBrief,
    pub eligibility: Eligibility,
    pub compatibility: Compatibility,
    #[serde(default, deserialize_with = "de::null_default")]
    pub recommended_actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractBrief {
    #[serde(rename = "type", default, deserialize_with = "de::null_default")]
    pub contract_type: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eligibility {
    pub status: EligibilityStatus,
    #[serde(default, deserialize_with = "de::null_default")]
    pub blocking_reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EligibilityStatus {
    Eligible,
    Ineligible,
    Unknown,
}

/// Fit between bidder and solicitation. Percentages are expected in
/// `[0, 100]` but are not checked here; NaN means the backend wrote
/// something other than a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compatibility {
    #[serde(deserialize_with = "de::percent")]
    pub match_percent: f64,
    #[serde(deserialize_with = "de::percent")]
    pub probability_of_win_percent: f64,
    pub go_no_go: GoNoGo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoNoGo {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "NO-GO", alias = "NO_GO", alias = "NOGO")]
    NoGo,
    #[serde(rename = "CONDITIONAL")]
    Conditional,
}

impl GoNoGo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Go => "GO",
            Self::NoGo => "NO-GO",
            Self::Conditional => "CONDITIONAL",
        }
    }
}

// ── Generate stage ──

/// One proposal section. `requirements_covered_ids` links it to
/// [`Requirement::id`] values for gap analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSection {
    pub id: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub content: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub requirements_covered_ids: Vec<String>,
}

/// Proposal draft. List order is document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default, deserialize_with = "de::null_default")]
    pub sections: Vec<DraftSection>,
}

// ── Score stage ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall: OverallScore,
    #[serde(default, deserialize_with = "de::null_default")]
    pub rtm: Vec<RtmEntry>,
    /// Anything other than an object reads as the default; the score stage
    /// replaces the page count regardless.
    #[serde(default, deserialize_with = "de::object_or_default")]
    pub format: FormatReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallScore {
    #[serde(deserialize_with = "de::percent")]
    pub score_percent: f64,
    #[serde(default, deserialize_with = "de::null_default")]
    pub readiness: String,
}

/// Requirements traceability matrix row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtmEntry {
    pub req_id: String,
    pub status: RtmStatus,
    #[serde(default, deserialize_with = "de::null_default")]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RtmStatus {
    Strong,
    Weak,
    Missing,
}

impl RtmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Weak => "weak",
            Self::Missing => "missing",
        }
    }
}

/// Format section of a score report. The score stage always replaces
/// `estimated_pages` with the local estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatReport {
    #[serde(default = "de::one", deserialize_with = "de::page_count")]
    pub estimated_pages: u32,
}

impl Default for FormatReport {
    fn default() -> Self {
        Self { estimated_pages: 1 }
    }
}

/// Deserialization helpers for backend output.
mod de {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn one() -> u32 {
        1
    }

    /// Treat an explicit `null` as the type's default.
    pub(super) fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    /// Accept a number, a numeric string, or anything else as `None`
    /// (the backend writes "unknown" for missing values).
    fn number(value: Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// A percentage, or NaN when the value is not numeric.
    pub(super) fn percent<'de, D>(d: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(number(Value::deserialize(d)?).unwrap_or(f64::NAN))
    }

    /// Deserialize an object normally; `null`, strings, and other non-objects
    /// become the default.
    pub(super) fn object_or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + DeserializeOwned,
    {
        match Value::deserialize(d)? {
            value @ Value::Object(_) => T::deserialize(value).map_err(D::Error::custom),
            _ => Ok(T::default()),
        }
    }

    pub(super) fn lenient_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(number(Value::deserialize(d)?).filter(|n| n.is_finite()))
    }

    pub(super) fn lenient_u32<'de, D>(d: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(number(Value::deserialize(d)?)
            .filter(|n| n.is_finite() && *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n.round() as u32))
    }

    pub(super) fn page_count<'de, D>(d: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(lenient_u32(d)?.unwrap_or(1).max(1))
    }
}
