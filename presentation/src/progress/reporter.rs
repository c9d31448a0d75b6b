//! Progress reporting for orchestration runs

use colored::Colorize;
use conductor_application::OrchestrationProgress;
use conductor_domain::{
    AgentTask, OrchestrationState, Plan, PlanResult, Step, StepResult, TaskWithResult,
    core::string::truncate_chars,
};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Task descriptions longer than this are cut in progress messages
const MESSAGE_CHARS: usize = 48;

fn step_label(index: usize, total: Option<usize>) -> String {
    match total {
        Some(total) => format!("Step {}/{}", index, total),
        None => format!("Step {}", index),
    }
}

/// Reports progress with a planning spinner and one bar per step
pub struct ProgressReporter {
    multi: MultiProgress,
    planning_bar: Mutex<Option<ProgressBar>>,
    step_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            planning_bar: Mutex::new(None),
            step_bar: Mutex::new(None),
        }
    }

    fn step_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn finish_planning(&self, message: String) {
        if let Ok(mut slot) = self.planning_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(message);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestrationProgress for ProgressReporter {
    fn on_state_change(&self, state: OrchestrationState) {
        if state != OrchestrationState::Planning {
            return;
        }
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Planning");
        pb.set_message("Waiting for planner...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.planning_bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_planning_attempt(&self, attempt: usize, max_attempts: usize) {
        if let Ok(slot) = self.planning_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.set_message(format!("attempt {}/{}", attempt, max_attempts));
        }
    }

    fn on_plan_rejected(&self, attempt: usize, reason: &str) {
        let _ = self.multi.println(format!(
            "  {} attempt {} rejected: {}",
            "!".yellow(),
            attempt,
            reason
        ));
    }

    fn on_plan_ready(&self, plan: &Plan) {
        self.finish_planning(format!(
            "{} ({} steps)",
            "plan ready".green(),
            plan.steps.len()
        ));
    }

    fn on_step_start(&self, index: usize, step: &Step, total: Option<usize>) {
        // Iterative mode plans each step itself
        self.finish_planning(format!("{}", "next step ready".green()));

        let pb = self.multi.add(ProgressBar::new(step.tasks.len() as u64));
        pb.set_style(Self::step_style());
        pb.set_prefix(step_label(index, total));
        pb.set_message(truncate_chars(&step.description, MESSAGE_CHARS).to_string());

        if let Ok(mut slot) = self.step_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, task: &TaskWithResult, success: bool) {
        if let Ok(slot) = self.step_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let mark = if success { "v".green() } else { "x".red() };
            pb.set_message(format!(
                "{} {} ({})",
                mark,
                truncate_chars(&task.description, MESSAGE_CHARS),
                task.agent_name()
            ));
            pb.inc(1);
        }
    }

    fn on_step_complete(&self, index: usize, _step_result: &StepResult) {
        if let Ok(mut slot) = self.step_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("Step {} {}", index, "complete!".green()));
        }
    }

    fn on_finished(&self, state: OrchestrationState, _plan_result: &PlanResult) {
        if let Ok(mut slot) = self.planning_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
        if let Ok(mut slot) = self.step_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.abandon_with_message(format!("{}", state.to_string().red()));
        }
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
pub struct SimpleProgress;

impl OrchestrationProgress for SimpleProgress {
    fn on_state_change(&self, state: OrchestrationState) {
        if state == OrchestrationState::Planning {
            eprintln!("{} {}", "->".cyan(), "Planning".bold());
        }
    }

    fn on_plan_rejected(&self, attempt: usize, reason: &str) {
        eprintln!("  {} attempt {} rejected: {}", "!".yellow(), attempt, reason);
    }

    fn on_plan_ready(&self, plan: &Plan) {
        eprintln!("  {} plan with {} steps", "v".green(), plan.steps.len());
    }

    fn on_step_start(&self, index: usize, step: &Step, total: Option<usize>) {
        eprintln!(
            "{} {}: {} ({} tasks)",
            "->".cyan(),
            step_label(index, total).bold(),
            step.description,
            step.tasks.len()
        );
    }

    fn on_task_start(&self, task: &AgentTask) {
        eprintln!("  {} {} [{}]", "..".dimmed(), task.description, task.agent);
    }

    fn on_task_complete(&self, task: &TaskWithResult, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), task.description);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), task.description);
        }
    }

    fn on_step_complete(&self, _index: usize, _step_result: &StepResult) {
        eprintln!();
    }

    fn on_finished(&self, state: OrchestrationState, plan_result: &PlanResult) {
        eprintln!(
            "{} {} after {} steps",
            "=>".cyan(),
            state.to_string().bold(),
            plan_result.step_results().len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_label() {
        assert_eq!(step_label(2, Some(3)), "Step 2/3");
        assert_eq!(step_label(4, None), "Step 4");
    }

    #[test]
    fn test_reporter_survives_out_of_order_callbacks() {
        let reporter = ProgressReporter::new();
        let task = TaskWithResult::new("orphan");
        reporter.on_task_complete(&task, true);
        reporter.on_step_complete(1, &StepResult::new(Step::new("s"), vec![], "r").unwrap());
        reporter.on_finished(OrchestrationState::Failed, &PlanResult::new("x"));
    }
}
