//! Prompt templates: the fixed analyst ruleset plus per-stage instructions
//! and schema descriptions.

// ── System ruleset ──

pub const SYSTEM_RULESET: &str = "\
You are a federal-proposal compliance analyst.

Hard rules:
- Use ONLY the solicitation text and company data supplied in the request.
- Never fabricate certifications, past performance, pricing, or clearances.
- Where information is missing, write \"unknown\" instead of guessing.
- Every content paragraph must trace to a requirement or evaluation factor.

Respond ONLY with a JSON object matching the requested schema. No markdown \
fences, no explanation, just raw JSON.";

// ── Stage instructions ──

pub const PARSE_INSTRUCTION: &str = "\
Extract the structure of the government solicitation below.
- Give every requirement a unique id (R1, R2, ...). Never reuse an id.
- priority is MUST for shall/must/required language, SHOULD for \
preferences, MAY for optional items.
- suggested_sections names the proposal sections that should answer it.
- Metadata and format fields you cannot find are null.
- questions_for_user lists facts the bidder must supply before drafting.
- If the solicitation text is empty, return empty lists and an empty scope_summary.";

pub const PARSE_SCHEMA: &str = r#"{
  "metadata": {"title": string|null, "agency": string|null, "solicitation_number": string|null,
               "due_date": string|null, "contract_type": string|null, "set_aside": string|null,
               "naics": string|null},
  "scope_summary": string,
  "requirements": [{"id": string, "text": string, "priority": "MUST"|"SHOULD"|"MAY",
                    "suggested_sections": [string]}],
  "evaluation_criteria": [{"factor": string, "text": string}],
  "format_constraints": {"max_pages_total": integer|null, "font_family": string|null,
                         "font_size_pt": number|null},
  "questions_for_user": [string]
}"#;

pub const ASSESS_INSTRUCTION: &str = "\
Assess whether the company should pursue this solicitation.
- eligibility.status is \"ineligible\" when a hard requirement or set-aside \
excludes the company, \"unknown\" when the data is insufficient.
- If the solicitation is a set-aside the company does not qualify for, \
probability_of_win_percent MUST be 0 and eligibility.status MUST be \"ineligible\".
- match_percent and probability_of_win_percent are numbers from 0 to 100.
- go_no_go is GO, NO-GO, or CONDITIONAL.
- recommended_actions are concrete next steps for the bidder.";

pub const ASSESS_SCHEMA: &str = r#"{
  "contract_brief": {"type": string, "pros": [string], "cons": [string]},
  "eligibility": {"status": "eligible"|"ineligible"|"unknown", "blocking_reasons": [string]},
  "compatibility": {"match_percent": number, "probability_of_win_percent": number,
                    "go_no_go": "GO"|"NO-GO"|"CONDITIONAL"},
  "recommended_actions": [string]
}"#;

pub const GENERATE_INSTRUCTION: &str = "\
Draft evaluator-friendly proposal sections for this solicitation.
- Ground every statement in the supplied solicitation and company data.
- Where the company data does not support a claim, write \"unknown\" \
rather than inventing it.
- requirements_covered_ids lists the requirement ids each section answers; \
use only ids from the parsed solicitation.
- Sections appear in document order.";

pub const GENERATE_SCHEMA: &str = r#"{
  "sections": [{"id": string, "title": string, "content": string,
                "requirements_covered_ids": [string]}]
}"#;

pub const SCORE_INSTRUCTION: &str = "\
Score the proposal draft against the solicitation.
- Produce exactly one rtm entry per requirement id in the parsed solicitation.
- status is \"strong\" when a section fully answers the requirement, \"weak\" \
when partially, \"missing\" when no section answers it.
- Cross-reference requirements_covered_ids against the requirement list; the \
locally computed gaps below are authoritative for which ids no section claims.
- overall.score_percent is a number from 0 to 100; overall.readiness is a short label.";

pub const SCORE_SCHEMA: &str = r#"{
  "overall": {"score_percent": number, "readiness": string},
  "rtm": [{"req_id": string, "status": "strong"|"weak"|"missing", "notes": string}],
  "format": {"estimated_pages": integer}
}"#;

/// Assemble a stage prompt: instruction, schema, then labelled data blocks.
pub fn compose(instruction: &str, schema: &str, blocks: &[(&str, &str)]) -> String {
    let mut prompt = format!("{instruction}\n\nReturn JSON with this schema:\n{schema}\n");
    for (label, body) in blocks {
        prompt.push_str(&format!("\n{label}:\n{body}\n"));
    }
    prompt
}
