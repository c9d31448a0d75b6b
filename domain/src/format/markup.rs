//! Tagged markup rendering of execution state.
//!
//! Every entity is wrapped in a `conductor:`-namespaced tag. Attributes are
//! emitted in a fixed order so the output is stable across calls.

use super::{ExecutionHistory, NO_STEPS_EXECUTED, plan_status};
use crate::core::string::truncate_chars;
use crate::plan::{PlanResult, StepResult, TaskWithResult};

/// Tag namespace prefix.
pub const NAMESPACE: &str = "conductor";

/// Maximum characters of a description repeated in a tag attribute.
pub const ATTRIBUTE_DESCRIPTION_CHARS: usize = 50;

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn tag(name: &str, content: &str, attributes: &[(&str, &str)]) -> String {
    let attrs: String = attributes
        .iter()
        .map(|(key, value)| format!(" {}=\"{}\"", key, escape_attribute(value)))
        .collect();
    format!(
        "<{ns}:{name}{attrs}>{content}</{ns}:{name}>",
        ns = NAMESPACE,
        name = name,
        attrs = attrs,
        content = content
    )
}

pub fn format_task_result_markup(task_result: &TaskWithResult) -> String {
    let short = truncate_chars(&task_result.description, ATTRIBUTE_DESCRIPTION_CHARS);
    let mut attributes = vec![("description", short.as_str())];
    if let Some(agent) = task_result.agent.as_deref() {
        attributes.push(("agent", agent));
    }

    let body = format!(
        "\n{}\n{}\n",
        tag("description", &task_result.description, &[]),
        tag("result", &task_result.result, &[])
    );
    tag("task-result", &body, &attributes)
}

pub fn format_step_result_markup(step_result: &StepResult) -> String {
    let tasks = step_result
        .task_results()
        .iter()
        .map(format_task_result_markup)
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        "\n{}\n{}\n{}\n",
        tag("description", &step_result.step().description, &[]),
        tag("summary", step_result.result(), &[]),
        tag("task-results", &format!("\n{}\n", tasks), &[])
    );
    tag("step-result", &body, &[])
}

pub fn format_plan_result_markup(plan_result: &PlanResult) -> String {
    let steps = match ExecutionHistory::of(plan_result) {
        ExecutionHistory::NotStarted => NO_STEPS_EXECUTED.to_string(),
        ExecutionHistory::Steps(steps) => format!(
            "\n{}\n",
            steps
                .iter()
                .map(format_step_result_markup)
                .collect::<Vec<_>>()
                .join("\n")
        ),
    };

    let body = format!(
        "\n{}\n{}\n{}\n",
        tag("objective", &plan_result.objective, &[]),
        tag("steps", &steps, &[]),
        tag("status", &plan_status(plan_result), &[])
    );
    tag("progress", &body, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{AgentTask, Step};

    #[test]
    fn test_task_markup() {
        let task = TaskWithResult::new("Move a.mp4").with_result("done").with_agent("organizer");
        assert_eq!(
            format_task_result_markup(&task),
            "<conductor:task-result description=\"Move a.mp4\" agent=\"organizer\">\n\
             <conductor:description>Move a.mp4</conductor:description>\n\
             <conductor:result>done</conductor:result>\n\
             </conductor:task-result>"
        );
    }

    #[test]
    fn test_task_markup_without_agent() {
        let markup = format_task_result_markup(&TaskWithResult::new("x"));
        assert!(markup.starts_with("<conductor:task-result description=\"x\">"));
        assert!(!markup.contains("agent="));
    }

    #[test]
    fn test_long_description_truncated_in_attribute_only() {
        let description = "a".repeat(80);
        let markup = format_task_result_markup(&TaskWithResult::new(description.clone()));

        let expected_attr = format!("description=\"{}...\"", "a".repeat(50));
        assert!(markup.contains(&expected_attr));
        assert!(markup.contains(&format!(
            "<conductor:description>{}</conductor:description>",
            description
        )));
    }

    #[test]
    fn test_attribute_escaping() {
        let task = TaskWithResult::new(r#"Say "hi" & <wave>"#);
        let markup = format_task_result_markup(&task);
        assert!(markup.contains(r#"description="Say &quot;hi&quot; &amp; &lt;wave&gt;""#));
    }

    #[test]
    fn test_plan_markup_not_started() {
        let markup = format_plan_result_markup(&PlanResult::new("Organize"));
        assert_eq!(
            markup,
            "<conductor:progress>\n\
             <conductor:objective>Organize</conductor:objective>\n\
             <conductor:steps>No steps executed yet</conductor:steps>\n\
             <conductor:status>Not Started</conductor:status>\n\
             </conductor:progress>"
        );
    }

    #[test]
    fn test_plan_markup_keeps_task_order() {
        let step = Step::new("Organize").with_tasks(vec![
            AgentTask::new("first", "organizer"),
            AgentTask::new("second", "organizer"),
            AgentTask::new("third", "organizer"),
        ]);
        let results = step
            .tasks
            .iter()
            .map(|t| TaskWithResult::from_task(t, "ok"))
            .collect();
        let mut plan_result = PlanResult::new("Organize");
        plan_result.add_step_result(StepResult::new(step, results, "done").unwrap());

        let markup = format_plan_result_markup(&plan_result);
        let first = markup.find("description=\"first\"").unwrap();
        let second = markup.find("description=\"second\"").unwrap();
        let third = markup.find("description=\"third\"").unwrap();
        assert!(first < second && second < third);
        assert!(markup.contains("<conductor:status>In Progress</conductor:status>"));

        assert_eq!(markup, format_plan_result_markup(&plan_result));
    }
}
