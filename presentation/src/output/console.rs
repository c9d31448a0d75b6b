//! Console output formatter for orchestration outcomes

use colored::Colorize;
use conductor_application::OrchestrationOutcome;
use conductor_domain::{
    OrchestrationState, OutputFormat, format_plan_result_markup, format_plan_result_text,
};
use serde::Serialize;

/// Formats orchestration outcomes for console display
pub struct ConsoleFormatter;

/// JSON view of an outcome. The error is flattened to its message.
#[derive(Serialize)]
struct OutcomeView<'a> {
    state: OrchestrationState,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    plan_result: &'a conductor_domain::PlanResult,
}

impl ConsoleFormatter {
    /// Enable or disable ANSI colors for everything this process prints
    pub fn set_color(enabled: bool) {
        if enabled {
            colored::control::unset_override();
        } else {
            colored::control::set_override(false);
        }
    }

    /// Render an outcome in the requested format
    pub fn render(outcome: &OrchestrationOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self::format(outcome),
            OutputFormat::Markup => Self::format_markup(outcome),
            OutputFormat::Json => Self::format_json(outcome),
        }
    }

    /// Format the complete outcome as a human-readable report
    pub fn format(outcome: &OrchestrationOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Conductor Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n",
            "Objective:".cyan().bold(),
            outcome.plan_result.objective
        ));
        output.push_str(&format!(
            "{} {}\n",
            "State:".cyan().bold(),
            Self::state_label(outcome.state)
        ));
        if let Some(ref error) = outcome.error {
            output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
        }

        output.push_str(&Self::section_header("Progress"));
        output.push_str(&format_plan_result_text(&outcome.plan_result));
        output.push('\n');

        output.push_str(&Self::footer());
        output
    }

    /// Format as the tagged markup the planner receives
    pub fn format_markup(outcome: &OrchestrationOutcome) -> String {
        format_plan_result_markup(&outcome.plan_result)
    }

    /// Format as JSON
    pub fn format_json(outcome: &OrchestrationOutcome) -> String {
        let view = OutcomeView {
            state: outcome.state,
            success: outcome.is_success(),
            error: outcome.error.as_ref().map(ToString::to_string),
            plan_result: &outcome.plan_result,
        };
        serde_json::to_string_pretty(&view).unwrap_or_else(|_| "{}".to_string())
    }

    fn state_label(state: OrchestrationState) -> String {
        match state {
            OrchestrationState::Complete => state.to_string().green().bold().to_string(),
            OrchestrationState::Cancelled => state.to_string().yellow().bold().to_string(),
            s if s.is_failure() => s.to_string().red().bold().to_string(),
            s => s.to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
