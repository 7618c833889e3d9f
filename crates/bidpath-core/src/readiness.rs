//! Local bid-readiness indicators: profile completeness, certification
//! overlap warnings, and the weighted overall progress figure.
//!
//! These are advisory. Eligibility itself is decided by the assess stage.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contracts::{CompanyProfile, Draft, ParsedSolicitation};
use crate::heuristics::solicitation_set_asides;

/// Profile fields counted by [`CompanyProfile::completion_percent`].
pub const PROFILE_FIELDS: &[&str] = &[
    "legal_name",
    "uei",
    "cage",
    "address",
    "website",
    "naics",
    "certifications",
    "capability_summary",
    "differentiators",
    "past_performance",
    "key_personnel",
];

const COMPLIANCE_WEIGHT: f64 = 0.45;
const COMPANY_WEIGHT: f64 = 0.35;
const WIN_WEIGHT: f64 = 0.20;

impl CompanyProfile {
    /// Share of [`PROFILE_FIELDS`] that are filled in, rounded to a whole percent.
    pub fn completion_percent(&self) -> u32 {
        let filled = PROFILE_FIELDS
            .iter()
            .filter(|&&field| self.0.get(field).is_some_and(is_filled))
            .count();
        percent_of(filled, PROFILE_FIELDS.len())
    }
}

fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(_) => true,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => items.iter().any(is_filled),
        Value::Object(fields) => fields.values().any(is_filled),
    }
}

fn percent_of(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// A non-blocking mismatch between solicitation set-asides and the
/// certifications the company lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EligibilityWarning {
    /// The solicitation names set-asides and the company lists no certifications.
    NoCertifications { set_asides: Vec<String> },
    /// None of the company's certifications match a named set-aside.
    NoOverlap {
        set_asides: Vec<String>,
        certifications: Vec<String>,
    },
}

impl fmt::Display for EligibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCertifications { set_asides } => write!(
                f,
                "solicitation mentions {} but the company lists no certifications",
                set_asides.join(", ")
            ),
            Self::NoOverlap {
                set_asides,
                certifications,
            } => write!(
                f,
                "solicitation mentions {} but the company lists only {}",
                set_asides.join(", "),
                certifications.join(", ")
            ),
        }
    }
}

/// Compare set-aside keywords found in `parsed` with `company`'s
/// certifications (case-insensitively).
pub fn eligibility_warnings(
    parsed: &ParsedSolicitation,
    company: &CompanyProfile,
) -> Vec<EligibilityWarning> {
    let set_asides: Vec<String> = solicitation_set_asides(parsed)
        .into_iter()
        .map(String::from)
        .collect();
    if set_asides.is_empty() {
        return Vec::new();
    }

    let certifications = company.certifications();
    if certifications.is_empty() {
        return vec![EligibilityWarning::NoCertifications { set_asides }];
    }

    let held: HashSet<String> = certifications.iter().map(|c| c.to_lowercase()).collect();
    if set_asides.iter().any(|s| held.contains(&s.to_lowercase())) {
        return Vec::new();
    }
    vec![EligibilityWarning::NoOverlap {
        set_asides,
        certifications,
    }]
}

/// Win-strength heuristic out of four signals: differentiators and past
/// performance in the profile, an executive summary section, and at least
/// one other section with content.
pub fn win_strength_percent(company: &CompanyProfile, draft: &Draft) -> u32 {
    let has = |field: &str| company.0.get(field).is_some_and(is_filled);
    let written: Vec<_> = draft
        .sections
        .iter()
        .filter(|s| !s.content.trim().is_empty())
        .collect();
    let is_summary = |id: &str, title: &str| {
        id.to_lowercase().contains("summary") || title.to_lowercase().contains("summary")
    };
    let summary = written.iter().any(|s| is_summary(&s.id, &s.title));
    let narrative = written.iter().any(|s| !is_summary(&s.id, &s.title));

    let signals = [has("differentiators"), has("past_performance"), summary, narrative];
    percent_of(signals.iter().filter(|&&b| b).count(), signals.len())
}

/// Local readiness figures for one bid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub compliance_percent: u32,
    pub company_percent: u32,
    pub win_strength_percent: u32,
    /// Weighted 45% compliance, 35% company profile, 20% win strength.
    pub overall_percent: u32,
}

impl Progress {
    pub fn new(compliance_percent: u32, company_percent: u32, win_strength_percent: u32) -> Self {
        let overall = compliance_percent as f64 * COMPLIANCE_WEIGHT
            + company_percent as f64 * COMPANY_WEIGHT
            + win_strength_percent as f64 * WIN_WEIGHT;
        Self {
            compliance_percent,
            company_percent,
            win_strength_percent,
            overall_percent: overall.round() as u32,
        }
    }
}
