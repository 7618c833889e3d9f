//! Local RTM aggregation and requirement gap analysis.
//!
//! None of this calls the backend: it summarises what the score stage
//! returned and cross-references draft sections against requirements.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::contracts::{DraftSection, ParsedSolicitation, RtmEntry, RtmStatus, ScoreReport};

/// Status counts over an RTM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtmSummary {
    pub strong: usize,
    pub weak: usize,
    pub missing: usize,
    pub total: usize,
    /// `strong` counts fully, `weak` counts half. 0 for an empty RTM.
    pub compliance_percent: u32,
}

impl RtmSummary {
    pub fn from_entries(entries: &[RtmEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry.status {
                RtmStatus::Strong => summary.strong += 1,
                RtmStatus::Weak => summary.weak += 1,
                RtmStatus::Missing => summary.missing += 1,
            }
        }
        summary.total = entries.len();
        if summary.total > 0 {
            let earned = summary.strong as f64 + summary.weak as f64 * 0.5;
            summary.compliance_percent = (earned / summary.total as f64 * 100.0).round() as u32;
        }
        summary
    }
}

/// RTM entries that are not `strong`, in list order.
pub fn unresolved(entries: &[RtmEntry]) -> Vec<&RtmEntry> {
    entries
        .iter()
        .filter(|e| e.status != RtmStatus::Strong)
        .collect()
}

/// Requirement ids with no RTM entry in `report`, in requirement order.
///
/// Coverage completeness is the backend's job; this only reports it.
pub fn missing_from_rtm<'a>(parsed: &'a ParsedSolicitation, report: &ScoreReport) -> Vec<&'a str> {
    let reported: HashSet<&str> = report.rtm.iter().map(|e| e.req_id.as_str()).collect();
    parsed
        .requirements
        .iter()
        .map(|r| r.id.as_str())
        .filter(|id| !reported.contains(id))
        .collect()
}

/// Cross-reference of draft sections against solicitation requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGaps {
    /// Requirement ids no section claims to cover, in requirement order.
    pub uncovered: Vec<String>,
    /// Ids claimed by sections that the solicitation does not define.
    pub unknown_refs: Vec<String>,
}

impl CoverageGaps {
    pub fn analyze(parsed: &ParsedSolicitation, sections: &[DraftSection]) -> Self {
        let known: HashSet<&str> = parsed.requirements.iter().map(|r| r.id.as_str()).collect();
        let claimed: HashSet<&str> = sections
            .iter()
            .flat_map(|s| s.requirements_covered_ids.iter().map(String::as_str))
            .collect();

        let uncovered = parsed
            .requirements
            .iter()
            .filter(|r| !claimed.contains(r.id.as_str()))
            .map(|r| r.id.clone())
            .collect();

        let mut seen = HashSet::new();
        let unknown_refs = sections
            .iter()
            .flat_map(|s| s.requirements_covered_ids.iter())
            .filter(|id| !known.contains(id.as_str()) && seen.insert(id.as_str()))
            .cloned()
            .collect();

        Self {
            uncovered,
            unknown_refs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.uncovered.is_empty() && self.unknown_refs.is_empty()
    }
}

/// Letter grade for a percentage score.
pub fn letter_grade(percent: f64) -> char {
    match percent {
        p if p >= 90.0 => 'A',
        p if p >= 80.0 => 'B',
        p if p >= 70.0 => 'C',
        p if p >= 60.0 => 'D',
        _ => 'F',
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessBand {
    Ready,
    InProgress,
    NotReady,
}

impl ReadinessBand {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 80.0 {
            Self::Ready
        } else if percent >= 50.0 {
            Self::InProgress
        } else {
            Self::NotReady
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::InProgress => "In Progress",
            Self::NotReady => "Not Ready",
        }
    }
}
