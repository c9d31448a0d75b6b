//! Plain-text rendering of execution state.

use super::{ExecutionHistory, NO_STEPS_EXECUTED, plan_status};
use crate::plan::{PlanResult, StepResult, TaskWithResult};

/// ```text
/// Task: <description>
/// Result: <result>
/// ```
pub fn format_task_result_text(task_result: &TaskWithResult) -> String {
    format!(
        "Task: {}\nResult: {}",
        task_result.description, task_result.result
    )
}

pub fn format_step_result_text(step_result: &StepResult) -> String {
    let tasks = step_result
        .task_results()
        .iter()
        .map(|task| format!("  - {}", format_task_result_text(task)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Step: {}\nStep Summary: {}\nStep Subtasks:\n{}",
        step_result.step().description,
        step_result.result(),
        tasks
    )
}

pub fn format_plan_result_text(plan_result: &PlanResult) -> String {
    let steps = match ExecutionHistory::of(plan_result) {
        ExecutionHistory::NotStarted => NO_STEPS_EXECUTED.to_string(),
        ExecutionHistory::Steps(steps) => steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}:\n{}", i + 1, format_step_result_text(step)))
            .collect::<Vec<_>>()
            .join("\n\n"),
    };

    format!(
        "Plan Objective: {}\n\nProgress So Far (steps completed):\n{}\n\nPlan Current Status: {}",
        plan_result.objective,
        steps,
        plan_status(plan_result)
    )
}

/// Deterministic step summary used when no synthesizer is available.
pub fn summarize_task_results(task_results: &[TaskWithResult]) -> String {
    if task_results.is_empty() {
        return "No tasks were executed".to_string();
    }
    task_results
        .iter()
        .map(format_task_result_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Deterministic final result used when no synthesizer is available.
pub fn summarize_step_results(step_results: &[StepResult]) -> String {
    if step_results.is_empty() {
        return "No steps were executed".to_string();
    }
    step_results
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}: {}", i + 1, step.step().description, step.result()))
        .collect::<Vec<_>>()
        .join("\n")
}
