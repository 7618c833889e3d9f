//! Human-readable cards for stage results.
//!
//! Each `*_card` renders one result as grouped, aligned text for `--pretty`.

use bidpath_core::{
    AssessmentResult, CoverageGaps, Draft, EligibilityWarning, ParsedSolicitation,
    ReadinessBand, RtmSummary, ScoreReport, letter_grade, unresolved,
};

const MAX_LIST_ITEMS: usize = 10;

// ── Public API ──

pub fn parsed_card(parsed: &ParsedSolicitation) -> String {
    let mut out = String::new();
    let meta = &parsed.metadata;
    header(&mut out, meta.title.as_deref().unwrap_or("Untitled solicitation"));
    if !parsed.scope_summary.is_empty() {
        line(&mut out, &parsed.scope_summary);
        line(&mut out, "");
    }

    section(&mut out, "Metadata");
    field(&mut out, "agency", meta.agency.as_deref());
    field(&mut out, "solicitation_number", meta.solicitation_number.as_deref());
    field(&mut out, "due_date", meta.due_date.as_deref());
    field(&mut out, "contract_type", meta.contract_type.as_deref());
    field(&mut out, "set_aside", meta.set_aside.as_deref());
    field(&mut out, "naics", meta.naics.as_deref());

    let fc = &parsed.format_constraints;
    let pages = fc.max_pages_total.map(|p| p.to_string());
    let font = match (&fc.font_family, fc.font_size_pt) {
        (Some(family), Some(size)) => Some(format!("{family} {size}pt")),
        (Some(family), None) => Some(family.clone()),
        (None, Some(size)) => Some(format!("{size}pt")),
        (None, None) => None,
    };
    if pages.is_some() || font.is_some() {
        section(&mut out, "Format");
        field(&mut out, "max_pages_total", pages.as_deref());
        field(&mut out, "font", font.as_deref());
    }

    let requirements: Vec<String> = parsed
        .requirements
        .iter()
        .map(|r| format!("[{}] {:<6} {}", r.id, r.priority.as_str(), r.text))
        .collect();
    list(&mut out, "Requirements", &requirements);

    let criteria: Vec<String> = parsed
        .evaluation_criteria
        .iter()
        .map(|c| format!("{}: {}", c.factor, c.text))
        .collect();
    list(&mut out, "Evaluation Criteria", &criteria);
    list(&mut out, "Questions", &parsed.questions_for_user);
    out
}

/// `company_percent` and `warnings` are the locally computed profile
/// completeness and certification checks.
pub fn assessment_card(
    assessment: &AssessmentResult,
    company_percent: u32,
    warnings: &[EligibilityWarning],
) -> String {
    let mut out = String::new();
    let compat = &assessment.compatibility;
    header(&mut out, &format!("Recommendation: {}", compat.go_no_go.as_str()));

    section(&mut out, "Compatibility");
    field(&mut out, "match", Some(&percent(compat.match_percent)));
    field(
        &mut out,
        "probability_of_win",
        Some(&percent(compat.probability_of_win_percent)),
    );
    field(
        &mut out,
        "eligibility",
        Some(&format!("{:?}", assessment.eligibility.status).to_lowercase()),
    );
    field(
        &mut out,
        "contract_type",
        Some(assessment.contract_brief.contract_type.as_str()).filter(|s| !s.is_empty()),
    );

    field(&mut out, "company_profile", Some(&format!("{company_percent}% complete")));

    list(&mut out, "Blocking Reasons", &assessment.eligibility.blocking_reasons);
    let warnings: Vec<String> = warnings.iter().map(ToString::to_string).collect();
    list(&mut out, "Eligibility Warnings", &warnings);
    list(&mut out, "Pros", &assessment.contract_brief.pros);
    list(&mut out, "Cons", &assessment.contract_brief.cons);
    list(&mut out, "Recommended Actions", &assessment.recommended_actions);
    out
}

pub fn draft_card(draft: &Draft) -> String {
    let mut out = String::new();
    header(&mut out, &format!("Draft ({} sections)", draft.sections.len()));
    for s in &draft.sections {
        section(&mut out, &format!("{} [{}]", s.title, s.id));
        field(
            &mut out,
            "words",
            Some(&s.content.split_whitespace().count().to_string()),
        );
        field(
            &mut out,
            "covers",
            Some(s.requirements_covered_ids.join(", ").as_str()).filter(|s| !s.is_empty()),
        );
    }
    out
}

pub fn score_card(report: &ScoreReport, gaps: Option<&CoverageGaps>) -> String {
    let mut out = String::new();
    let score = report.overall.score_percent;
    header(
        &mut out,
        &format!("Score {} (grade {})", percent(score), letter_grade(score)),
    );

    section(&mut out, "Overall");
    field(&mut out, "readiness", Some(report.overall.readiness.as_str()));
    field(
        &mut out,
        "band",
        Some(ReadinessBand::from_percent(score).label()),
    );
    field(
        &mut out,
        "estimated_pages",
        Some(&report.format.estimated_pages.to_string()),
    );

    let summary = RtmSummary::from_entries(&report.rtm);
    section(&mut out, "RTM");
    field(&mut out, "strong", Some(&summary.strong.to_string()));
    field(&mut out, "weak", Some(&summary.weak.to_string()));
    field(&mut out, "missing", Some(&summary.missing.to_string()));
    field(
        &mut out,
        "compliance",
        Some(&format!("{}%", summary.compliance_percent)),
    );

    let open: Vec<String> = unresolved(&report.rtm)
        .into_iter()
        .map(|e| format!("[{}] {} {}", e.req_id, e.status.as_str(), e.notes))
        .collect();
    list(&mut out, "Unresolved", &open);

    if let Some(gaps) = gaps {
        list(&mut out, "Uncovered Requirements", &gaps.uncovered);
        list(&mut out, "Unknown References", &gaps.unknown_refs);
    }
    out
}

// ── Rendering helpers ──

/// Whole percent, or "unknown" when the backend gave no number.
fn percent(value: f64) -> String {
    if value.is_nan() {
        "unknown".to_string()
    } else {
        format!("{value:.0}%")
    }
}

fn header(out: &mut String, title: &str) {
    out.push_str(&format!("=== {title} ===\n\n"));
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn section(out: &mut String, name: &str) {
    line(out, name);
}

fn field(out: &mut String, name: &str, value: Option<&str>) {
    if let Some(v) = value {
        out.push_str(&format!("  {:<26} {}\n", name, v));
    }
}

fn list(out: &mut String, name: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("{name} ({})\n", items.len()));
    for item in items.iter().take(MAX_LIST_ITEMS) {
        out.push_str(&format!("  - {item}\n"));
    }
    if items.len() > MAX_LIST_ITEMS {
        out.push_str(&format!("  ... and {} more\n", items.len() - MAX_LIST_ITEMS));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidpath_core::{FormatReport, OverallScore, RtmEntry, RtmStatus};

    fn report() -> ScoreReport {
        ScoreReport {
            overall: OverallScore {
                score_percent: 82.0,
                readiness: "Nearly ready".into(),
            },
            rtm: vec![
                RtmEntry {
                    req_id: "R1".into(),
                    status: RtmStatus::Strong,
                    notes: String::new(),
                },
                RtmEntry {
                    req_id: "R2".into(),
                    status: RtmStatus::Missing,
                    notes: "not addressed".into(),
                },
            ],
            format: FormatReport { estimated_pages: 3 },
        }
    }

    #[test]
    fn score_card_summarises_rtm() {
        let card = score_card(&report(), None);
        assert!(card.starts_with("=== Score 82% (grade B) ===\n"));
        assert!(card.contains("band                       Ready"));
        assert!(card.contains("estimated_pages            3"));
        assert!(card.contains("compliance                 50%"));
        assert!(card.contains("Unresolved (1)\n  - [R2] missing not addressed"));
    }

    #[test]
    fn score_card_lists_gaps() {
        let gaps = CoverageGaps {
            uncovered: vec!["R2".into()],
            unknown_refs: vec![],
        };
        let card = score_card(&report(), Some(&gaps));
        assert!(card.contains("Uncovered Requirements (1)"));
        assert!(!card.contains("Unknown References"));
    }

    #[test]
    fn long_lists_are_capped() {
        let mut out = String::new();
        let items: Vec<String> = (0..13).map(|i| format!("item {i}")).collect();
        list(&mut out, "Items", &items);
        assert!(out.contains("  - item 9\n"));
        assert!(!out.contains("item 10"));
        assert!(out.ends_with("  ... and 3 more\n"));
    }

    fn assessment(match_percent: f64) -> AssessmentResult {
        serde_json::from_value(serde_json::json!({
            "contract_brief": {"type": "FFP"},
            "eligibility": {"status": "eligible"},
            "compatibility": {
                "match_percent": match_percent,
                "probability_of_win_percent": 30,
                "go_no_go": "CONDITIONAL"
            }
        }))
        .unwrap()
    }

    #[test]
    fn assessment_card_shows_local_checks() {
        let warnings = vec![EligibilityWarning::NoCertifications {
            set_asides: vec!["HUBZone".into()],
        }];
        let card = assessment_card(&assessment(64.0), 45, &warnings);
        assert!(card.starts_with("=== Recommendation: CONDITIONAL ===\n"));
        assert!(card.contains("match                      64%"));
        assert!(card.contains("company_profile            45% complete"));
        assert!(card.contains(
            "Eligibility Warnings (1)\n  - solicitation mentions HUBZone but the company lists no certifications"
        ));
    }

    #[test]
    fn unknown_percent_is_labelled() {
        let mut a = assessment(10.0);
        a.compatibility.match_percent = f64::NAN;
        let card = assessment_card(&a, 0, &[]);
        assert!(card.contains("match                      unknown"));
        assert!(!card.contains("Eligibility Warnings"));
    }

    #[test]
    fn parsed_card_skips_missing_fields() {
        let parsed = ParsedSolicitation::default();
        let card = parsed_card(&parsed);
        assert!(card.starts_with("=== Untitled solicitation ==="));
        assert!(!card.contains("agency"));
        assert!(!card.contains("Format"));
    }
}
