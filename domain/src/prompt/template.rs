//! Prompt templates for planning and synthesis

use crate::agent::AgentDescriptor;
use crate::format::{format_plan_result_markup, format_task_result_markup};
use crate::plan::{PlanResult, PlanningMode, Step, TaskWithResult};

/// Templates for generating prompts at each stage of a run
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the planner
    pub fn planner_system() -> &'static str {
        r#"You are a planner coordinating a team of specialised agents.
Break the objective into steps. Steps run one after another; the tasks inside a
step run in parallel and must not depend on each other.
Assign every task to exactly one agent from the roster, using its exact name.
Answer with a single JSON document and nothing else."#
    }

    /// Render the agent roster, one agent per line.
    pub fn agent_roster(agents: &[AgentDescriptor]) -> String {
        if agents.is_empty() {
            return "(no agents available)".to_string();
        }
        agents
            .iter()
            .map(|a| {
                if a.instruction.trim().is_empty() {
                    format!("- {}", a.name)
                } else {
                    format!("- {}: {}", a.name, a.instruction.trim())
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// JSON shape the planner must answer with in the given mode
    pub fn response_schema(mode: PlanningMode) -> &'static str {
        match mode {
            PlanningMode::Full => {
                r#"{
  "steps": [
    {
      "description": "what this step achieves",
      "tasks": [
        { "description": "self-contained instruction", "agent": "agent name" }
      ]
    }
  ],
  "is_complete": true
}"#
            }
            PlanningMode::Iterative => {
                r#"{
  "description": "what this step achieves",
  "tasks": [
    { "description": "self-contained instruction", "agent": "agent name" }
  ],
  "is_complete": false
}"#
            }
        }
    }

    /// User prompt asking the planner for its next answer.
    ///
    /// `history` is the markup rendering of the run so far. `feedback` is the
    /// rejection message from a previous attempt, if any.
    pub fn planning_prompt(
        objective: &str,
        agents: &[AgentDescriptor],
        history: &str,
        mode: PlanningMode,
        feedback: Option<&str>,
    ) -> String {
        let instruction = match mode {
            PlanningMode::Full => {
                "Produce the complete plan for the objective. Set \"is_complete\" to true when \
                 executing every step will fully achieve the objective."
            }
            PlanningMode::Iterative => {
                "Produce only the next step, based on the progress so far. Set \"is_complete\" \
                 to true when the objective will be achieved once this step has run."
            }
        };

        let mut prompt = format!(
            r#"Objective: {objective}

Available agents:
{roster}

Progress so far:
{history}

{instruction}

Respond with JSON in exactly this shape:
```json
{schema}
```"#,
            objective = objective,
            roster = Self::agent_roster(agents),
            history = history,
            instruction = instruction,
            schema = Self::response_schema(mode),
        );

        if let Some(feedback) = feedback {
            prompt.push_str(&format!(
                "\n\nYour previous answer was rejected: {}\nFix the problem and answer again.",
                feedback
            ));
        }

        prompt
    }

    /// Task text asking an agent to summarise one finished step.
    pub fn step_synthesis(step: &Step, task_results: &[TaskWithResult]) -> String {
        let results = task_results
            .iter()
            .map(format_task_result_markup)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"Summarise the outcome of the step "{}" in a few sentences.
Mention anything that failed.

Task results:
{}"#,
            step.description, results
        )
    }

    /// Task text asking an agent for the final answer of a run.
    pub fn plan_synthesis(plan_result: &PlanResult) -> String {
        format!(
            r#"Write the final result for the objective "{}" from the progress below.
State plainly whether the objective was achieved.

{}"#,
            plan_result.objective,
            format_plan_result_markup(plan_result)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::AgentTask;

    fn roster() -> Vec<AgentDescriptor> {
        vec![
            AgentDescriptor::new("organizer", "Moves files into folders"),
            AgentDescriptor::new("echo", ""),
        ]
    }

    #[test]
    fn test_roster_lists_agents() {
        let text = PromptTemplate::agent_roster(&roster());
        assert_eq!(text, "- organizer: Moves files into folders\n- echo");
    }

    #[test]
    fn test_empty_roster() {
        assert_eq!(PromptTemplate::agent_roster(&[]), "(no agents available)");
    }

    #[test]
    fn test_planning_prompt_full() {
        let prompt = PromptTemplate::planning_prompt(
            "Organize 3 video files",
            &roster(),
            "No steps executed yet",
            PlanningMode::Full,
            None,
        );
        assert!(prompt.contains("Objective: Organize 3 video files"));
        assert!(prompt.contains("- organizer: Moves files into folders"));
        assert!(prompt.contains("\"steps\""));
        assert!(!prompt.contains("rejected"));
    }

    #[test]
    fn test_planning_prompt_iterative_with_feedback() {
        let prompt = PromptTemplate::planning_prompt(
            "Organize",
            &roster(),
            "<conductor:progress></conductor:progress>",
            PlanningMode::Iterative,
            Some("unknown agent 'sorter'"),
        );
        assert!(prompt.contains("only the next step"));
        assert!(!prompt.contains("\"steps\""));
        assert!(prompt.contains("rejected: unknown agent 'sorter'"));
    }

    #[test]
    fn test_step_synthesis_includes_results() {
        let step = Step::new("Organize").with_task(AgentTask::new("Move a", "organizer"));
        let results = vec![TaskWithResult::from_task(&step.tasks[0], "moved")];
        let prompt = PromptTemplate::step_synthesis(&step, &results);
        assert!(prompt.contains("\"Organize\""));
        assert!(prompt.contains("<conductor:result>moved</conductor:result>"));
    }

    #[test]
    fn test_plan_synthesis_includes_progress() {
        let prompt = PromptTemplate::plan_synthesis(&PlanResult::new("Organize"));
        assert!(prompt.contains("No steps executed yet"));
    }
}
