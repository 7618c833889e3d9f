//! Optional normalization pass over backend output.
//!
//! The stage operations never call these; a caller opts in after a stage
//! returns. Each function mutates in place and reports what it changed.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::contracts::{AssessmentResult, ParsedSolicitation, ScoreReport};

/// One change made by a normalization pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    RenamedRequirement { from: String, to: String },
    TrimmedRequirement { id: String },
    Clamped { field: &'static str, from: f64, to: f64 },
    PageFloor { from: u32 },
}

/// Make requirement ids pairwise distinct and trim requirement text.
///
/// The first occurrence of an id keeps it; later duplicates get `-2`, `-3`,
/// ... skipping any id already in use.
pub fn normalize_parsed(parsed: &mut ParsedSolicitation) -> Vec<Adjustment> {
    let mut adjustments = Vec::new();
    let mut taken: HashSet<String> = parsed.requirements.iter().map(|r| r.id.clone()).collect();
    let mut seen: HashSet<String> = HashSet::new();

    for req in &mut parsed.requirements {
        let trimmed = req.text.trim();
        if trimmed.len() != req.text.len() {
            req.text = trimmed.to_string();
            adjustments.push(Adjustment::TrimmedRequirement { id: req.id.clone() });
        }

        if seen.insert(req.id.clone()) {
            continue;
        }
        let mut n = 2;
        let renamed = loop {
            let candidate = format!("{}-{n}", req.id);
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        debug!(from = %req.id, to = %renamed, "renamed duplicate requirement id");
        taken.insert(renamed.clone());
        seen.insert(renamed.clone());
        adjustments.push(Adjustment::RenamedRequirement {
            from: std::mem::replace(&mut req.id, renamed.clone()),
            to: renamed,
        });
    }
    adjustments
}

/// Clamp both compatibility percentages into `[0, 100]`.
pub fn normalize_assessment(assessment: &mut AssessmentResult) -> Vec<Adjustment> {
    let compat = &mut assessment.compatibility;
    [
        clamp_percent("match_percent", &mut compat.match_percent),
        clamp_percent(
            "probability_of_win_percent",
            &mut compat.probability_of_win_percent,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Clamp the overall score and floor the page estimate at 1.
pub fn normalize_score(report: &mut ScoreReport) -> Vec<Adjustment> {
    let mut adjustments: Vec<Adjustment> =
        clamp_percent("score_percent", &mut report.overall.score_percent)
            .into_iter()
            .collect();
    if report.format.estimated_pages == 0 {
        adjustments.push(Adjustment::PageFloor { from: 0 });
        report.format.estimated_pages = 1;
    }
    adjustments
}

fn clamp_percent(field: &'static str, value: &mut f64) -> Option<Adjustment> {
    let clamped = if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    };
    if clamped == *value {
        return None;
    }
    let from = std::mem::replace(value, clamped);
    Some(Adjustment::Clamped {
        field,
        from,
        to: clamped,
    })
}
