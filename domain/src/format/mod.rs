//! Result formatting
//!
//! Pure, deterministic rendering of execution state. The same input always
//! produces byte-identical output: the markup form is fed back to the
//! planner on the next turn, so it is part of the planner contract.
//!
//! - [`text`]: human-readable plain text
//! - [`markup`]: tagged form used inside planner and agent prompts

pub mod markup;
pub mod text;

use std::borrow::Cow;

use crate::plan::{PlanResult, StepResult};

pub use markup::{format_plan_result_markup, format_step_result_markup, format_task_result_markup};
pub use text::{
    format_plan_result_text, format_step_result_text, format_task_result_text,
    summarize_step_results, summarize_task_results,
};

/// Shown instead of the step list before anything has run.
pub const NO_STEPS_EXECUTED: &str = "No steps executed yet";

/// What part of a run's history is available to render.
///
/// "Nothing has run yet" is its own variant rather than an empty list, so
/// the formatter never needs a placeholder step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExecutionHistory<'a> {
    NotStarted,
    Steps(&'a [StepResult]),
}

impl<'a> ExecutionHistory<'a> {
    pub fn of(plan_result: &'a PlanResult) -> Self {
        if plan_result.step_results().is_empty() {
            ExecutionHistory::NotStarted
        } else {
            ExecutionHistory::Steps(plan_result.step_results())
        }
    }
}

/// Status line for a plan result.
///
/// - complete: the final result (or `Complete` when none was recorded)
/// - ended without completing: the recorded explanation
/// - otherwise `Not Started` or `In Progress`
pub fn plan_status(plan_result: &PlanResult) -> Cow<'_, str> {
    match (&plan_result.result, plan_result.is_complete) {
        (Some(result), _) => Cow::Borrowed(result.as_str()),
        (None, true) => Cow::Borrowed("Complete"),
        (None, false) => match ExecutionHistory::of(plan_result) {
            ExecutionHistory::NotStarted => Cow::Borrowed("Not Started"),
            ExecutionHistory::Steps(_) => Cow::Borrowed("In Progress"),
        },
    }
}
