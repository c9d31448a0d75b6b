//! Parsing of planner replies.
//!
//! The planner collaborator answers with text. A reply may be:
//! 1. a fenced code block (` ```json `, ` ```plan ` or bare ` ``` `) containing JSON
//! 2. raw JSON (the entire reply is a JSON document)
//! 3. prose surrounding a single JSON object
//!
//! The extracted JSON is deserialized into [`Plan`] or [`NextStep`]; any
//! failure is reported as [`PlanValidationError::Invalid`].

use serde::de::DeserializeOwned;

use super::entities::{NextStep, Plan};
use super::mode::PlanningMode;
use super::validation::PlanValidationError;
use crate::core::string::truncate_str;

/// How much of an unparseable reply is quoted back in the error.
const REPLY_EXCERPT_BYTES: usize = 200;

/// A validated-shape planner reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerOutput {
    Plan(Plan),
    NextStep(NextStep),
}

impl PlannerOutput {
    pub fn is_complete(&self) -> bool {
        match self {
            PlannerOutput::Plan(plan) => plan.is_complete,
            PlannerOutput::NextStep(next) => next.is_complete,
        }
    }
}

/// Parse a reply into the shape expected for `mode`.
pub fn parse_reply(text: &str, mode: PlanningMode) -> Result<PlannerOutput, PlanValidationError> {
    match mode {
        PlanningMode::Full => parse_plan_reply(text).map(PlannerOutput::Plan),
        PlanningMode::Iterative => parse_next_step_reply(text).map(PlannerOutput::NextStep),
    }
}

/// Parse a full-plan reply.
pub fn parse_plan_reply(text: &str) -> Result<Plan, PlanValidationError> {
    parse_json(text)
}

/// Parse an iterative next-step reply.
pub fn parse_next_step_reply(text: &str) -> Result<NextStep, PlanValidationError> {
    parse_json(text)
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, PlanValidationError> {
    let json = extract_json(text).ok_or_else(|| {
        PlanValidationError::Invalid(format!(
            "no JSON object found in reply: {}",
            truncate_str(text.trim(), REPLY_EXCERPT_BYTES)
        ))
    })?;

    serde_json::from_str(json).map_err(|e| PlanValidationError::Invalid(e.to_string()))
}

/// Locate the JSON document inside a reply.
pub fn extract_json(text: &str) -> Option<&str> {
    let text = text.trim();

    if let Some(block) = fenced_block(text) {
        return Some(block);
    }

    if text.starts_with('{') {
        return Some(text);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Contents of the first fenced code block whose body looks like JSON.
fn fenced_block(text: &str) -> Option<&str> {
    let mut rest = text;
    while let Some(open) = rest.find("```") {
        let after_fence = &rest[open + 3..];
        // Skip the info string (json, plan, ...) up to the end of the line
        let body_start = after_fence.find('\n')? + 1;
        let body = &after_fence[body_start..];
        let close = body.find("```")?;
        let candidate = body[..close].trim();
        if candidate.starts_with('{') {
            return Some(candidate);
        }
        rest = &body[close + 3..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN_JSON: &str = r#"{"steps": [{"description": "Organize", "tasks": [{"description": "Move a.mp4", "agent": "organizer"}]}], "is_complete": true}"#;

    #[test]
    fn test_parse_raw_json() {
        let plan = parse_plan_reply(PLAN_JSON).unwrap();
        assert_eq!(plan.steps.len(), 1);
        assert_eq!(plan.steps[0].tasks[0].agent, "organizer");
        assert!(plan.is_complete);
    }

    #[test]
    fn test_parse_fenced_json() {
        let reply = format!("Here is the plan:\n\n```json\n{}\n```\nGood luck.", PLAN_JSON);
        let plan = parse_plan_reply(&reply).unwrap();
        assert_eq!(plan.steps[0].description, "Organize");
    }

    #[test]
    fn test_parse_plan_fence_after_unrelated_block() {
        let reply = format!(
            "```text\nnot json\n```\n\n```plan\n{}\n```",
            PLAN_JSON
        );
        let plan = parse_plan_reply(&reply).unwrap();
        assert!(plan.is_complete);
    }

    #[test]
    fn test_parse_json_with_prose_prefix() {
        let reply = format!("Sure! {} Let me know.", PLAN_JSON);
        assert!(parse_plan_reply(&reply).is_ok());
    }

    #[test]
    fn test_parse_next_step() {
        let next = parse_next_step_reply(
            r#"{"description": "List", "tasks": [{"description": "ls", "agent": "fs"}], "is_complete": false}"#,
        )
        .unwrap();
        assert_eq!(next.step.tasks.len(), 1);
        assert!(!next.is_complete);
    }

    #[test]
    fn test_plain_text_is_invalid() {
        let err = parse_plan_reply("I cannot help with that.").unwrap_err();
        assert!(matches!(err, PlanValidationError::Invalid(_)));
        assert!(err.to_string().contains("no JSON object"));
    }

    #[test]
    fn test_missing_completion_verdict_is_invalid() {
        let err = parse_next_step_reply(r#"{"description": "List", "tasks": []}"#).unwrap_err();
        assert!(err.to_string().contains("is_complete"));
    }

    #[test]
    fn test_parse_reply_by_mode() {
        let full = parse_reply(PLAN_JSON, PlanningMode::Full).unwrap();
        assert!(matches!(full, PlannerOutput::Plan(_)));
        assert!(full.is_complete());

        let iterative = parse_reply(
            r#"{"description": "x", "is_complete": true}"#,
            PlanningMode::Iterative,
        )
        .unwrap();
        assert!(matches!(iterative, PlannerOutput::NextStep(_)));
    }

    #[test]
    fn test_wrong_shape_for_mode_is_invalid() {
        assert!(parse_reply(PLAN_JSON, PlanningMode::Iterative).is_err());
        assert!(
            parse_reply(
                r#"{"description": "x", "tasks": [], "is_complete": false}"#,
                PlanningMode::Full
            )
            .is_err()
        );
    }
}
