//! Full pipeline run: parse, then assess and generate together, then score.

use serde::Serialize;
use tracing::{info, warn};

use bidpath_ai::{GenerationFailure, Pipeline};
use bidpath_core::{
    Adjustment, AssessmentResult, CompanyProfile, CoverageGaps, Draft, EligibilityWarning,
    ParsedSolicitation, Progress, RtmSummary, ScoreReport, eligibility_warnings,
    missing_from_rtm, normalize_assessment, normalize_parsed, normalize_score,
    win_strength_percent,
};

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub parsed: ParsedSolicitation,
    pub assessment: AssessmentResult,
    pub draft: Draft,
    pub score: ScoreReport,
    pub rtm_summary: RtmSummary,
    pub gaps: CoverageGaps,
    pub missing_from_rtm: Vec<String>,
    pub progress: Progress,
    pub eligibility_warnings: Vec<EligibilityWarning>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<Adjustment>,
}

pub async fn run(
    pipeline: &Pipeline,
    text: &str,
    company: &CompanyProfile,
    normalize: bool,
) -> Result<RunReport, GenerationFailure> {
    let mut adjustments = Vec::new();

    let mut parsed = pipeline.parse(text).await?;
    if normalize {
        adjustments.extend(normalize_parsed(&mut parsed));
    }
    info!(
        requirements = parsed.requirements.len(),
        "solicitation parsed"
    );

    let (mut assessment, draft) = futures::try_join!(
        pipeline.assess(&parsed, company),
        pipeline.generate(&parsed, company)
    )?;
    if normalize {
        adjustments.extend(normalize_assessment(&mut assessment));
    }

    let mut score = pipeline.score(&parsed, &draft.sections).await?;
    if normalize {
        adjustments.extend(normalize_score(&mut score));
    }

    let missing: Vec<String> = missing_from_rtm(&parsed, &score)
        .into_iter()
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        warn!(count = missing.len(), "requirements absent from RTM");
    }

    let rtm_summary = RtmSummary::from_entries(&score.rtm);
    let progress = Progress::new(
        rtm_summary.compliance_percent,
        company.completion_percent(),
        win_strength_percent(company, &draft),
    );
    let warnings = eligibility_warnings(&parsed, company);
    for warning in &warnings {
        warn!(%warning, "eligibility");
    }

    Ok(RunReport {
        rtm_summary,
        gaps: CoverageGaps::analyze(&parsed, &draft.sections),
        missing_from_rtm: missing,
        progress,
        eligibility_warnings: warnings,
        parsed,
        assessment,
        draft,
        score,
        adjustments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use bidpath_ai::{
        BackendError, GatewayConfig, GenerateRequest, GenerateResponse, GenerationBackend,
    };

    /// Replies by matching the stage schema named in the prompt.
    struct StageBackend {
        calls: Mutex<VecDeque<String>>,
    }

    const PARSED: &str = r#"{
        "metadata": {"title": "Help desk", "set_aside": "SDVOSB"},
        "scope_summary": "Tier 1 support",
        "requirements": [
            {"id": "R1", "text": "Staff a help desk", "priority": "MUST", "suggested_sections": []},
            {"id": "R1", "text": "  Report monthly ", "priority": "SHOULD", "suggested_sections": []}
        ],
        "evaluation_criteria": [],
        "format_constraints": {},
        "questions_for_user": []
    }"#;
    const ASSESSMENT: &str = r#"{
        "contract_brief": {"type": "FFP", "pros": [], "cons": []},
        "eligibility": {"status": "eligible", "blocking_reasons": []},
        "compatibility": {"match_percent": 140, "probability_of_win_percent": 40, "go_no_go": "GO"},
        "recommended_actions": []
    }"#;
    const DRAFT: &str = r#"{"sections": [
        {"id": "s1", "title": "Approach", "content": "We staff it.", "requirements_covered_ids": ["R1"]}
    ]}"#;
    const SCORE: &str = r#"{
        "overall": {"score_percent": 75, "readiness": "Close"},
        "rtm": [{"req_id": "R1", "status": "strong", "notes": ""}],
        "format": {"estimated_pages": 9}
    }"#;

    #[async_trait]
    impl GenerationBackend for StageBackend {
        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> Result<GenerateResponse, BackendError> {
            let prompt = &request.user_prompt;
            self.calls.lock().unwrap().push_back(prompt.clone());
            let text = if prompt.contains("PROPOSAL SECTIONS") {
                SCORE
            } else if prompt.contains("ELIGIBILITY HINTS") {
                ASSESSMENT
            } else if prompt.contains("PARSED SOLICITATION") {
                DRAFT
            } else {
                PARSED
            };
            Ok(GenerateResponse {
                text: text.to_string(),
                tokens_used: 0,
            })
        }
    }

    fn pipeline() -> (Pipeline, Arc<StageBackend>) {
        let backend = Arc::new(StageBackend {
            calls: Mutex::new(VecDeque::new()),
        });
        (
            Pipeline::new(backend.clone(), GatewayConfig::default()),
            backend,
        )
    }

    #[tokio::test]
    async fn run_threads_all_stages() {
        let (pipeline, backend) = pipeline();
        let report = run(&pipeline, "text", &CompanyProfile::default(), false)
            .await
            .unwrap();

        assert_eq!(backend.calls.lock().unwrap().len(), 4);
        assert_eq!(report.score.format.estimated_pages, 1);
        assert_eq!(report.rtm_summary.strong, 1);
        assert!(report.adjustments.is_empty());
        assert_eq!(report.assessment.compatibility.match_percent, 140.0);
        // Full RTM compliance, empty profile, one written section.
        assert_eq!(report.progress, Progress::new(100, 0, 25));
        assert_eq!(report.progress.overall_percent, 50);
        assert!(matches!(
            report.eligibility_warnings.as_slice(),
            [EligibilityWarning::NoCertifications { .. }]
        ));
    }

    #[tokio::test]
    async fn mismatched_certifications_are_flagged() {
        let (pipeline, _) = pipeline();
        let company: CompanyProfile = serde_json::from_str(
            r#"{"legal_name": "Acme", "certifications": ["WOSB"]}"#,
        )
        .unwrap();
        let report = run(&pipeline, "text", &company, false).await.unwrap();
        assert_eq!(
            report.eligibility_warnings,
            vec![EligibilityWarning::NoOverlap {
                set_asides: vec!["SDVOSB".into()],
                certifications: vec!["WOSB".into()],
            }]
        );
        assert_eq!(report.progress.company_percent, 18);
    }

    #[tokio::test]
    async fn normalize_flag_records_adjustments() {
        let (pipeline, _) = pipeline();
        let report = run(&pipeline, "text", &CompanyProfile::default(), true)
            .await
            .unwrap();

        assert_eq!(report.parsed.requirements[1].id, "R1-2");
        assert_eq!(report.parsed.requirements[1].text, "Report monthly");
        assert_eq!(report.assessment.compatibility.match_percent, 100.0);
        assert!(report.adjustments.iter().any(|a| matches!(
            a,
            Adjustment::RenamedRequirement { .. }
        )));
        assert_eq!(report.missing_from_rtm, vec!["R1-2"]);
    }
}
