pub mod contracts;
pub mod heuristics;
pub mod normalize;
pub mod pages;
pub mod readiness;
pub mod rtm;

pub use contracts::{
    AssessmentResult, Compatibility, CompanyProfile, ContractBrief, Draft, DraftSection,
    Eligibility, EligibilityStatus, EvaluationCriterion, FormatConstraints, FormatReport, GoNoGo,
    OverallScore, ParsedSolicitation, Priority, Requirement, RtmEntry, RtmStatus, ScoreReport,
    SolicitationMetadata,
};
pub use normalize::{Adjustment, normalize_assessment, normalize_parsed, normalize_score};
pub use pages::{DEFAULT_WORDS_PER_PAGE, estimate_pages, estimate_pages_with, joined_content};
pub use readiness::{EligibilityWarning, PROFILE_FIELDS, Progress, eligibility_warnings, win_strength_percent};
pub use rtm::{CoverageGaps, ReadinessBand, RtmSummary, letter_grade, missing_from_rtm, unresolved};
