//! `grove generate` command.

use serde_json::json;

use crate::cli::GoalArgs;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::goal::{RewardPair, Task};
use crate::workflow::GoalWorkflow;

use super::workflow_options;

/// Execute the `generate` command: generate and print tasks without saving.
///
/// # Errors
///
/// Returns the user-facing workflow error if generation fails.
pub async fn run(ctx: &ServiceContext, config: &Config, args: &GoalArgs) -> Result<(), String> {
    let (workflow, _completion) = GoalWorkflow::with_context(ctx, workflow_options(config));
    workflow
        .generate_tasks(&args.draft(), args.requester(config))
        .await
        .map_err(|e| e.to_string())?;

    let state = workflow.state();
    if args.json {
        println!("{}", tasks_json(&state.tasks)?);
    } else {
        print!("{}", render_tasks(&state.title, &state.tasks));
    }
    Ok(())
}

/// Renders tasks and their reward total for the terminal.
pub(crate) fn render_tasks(title: &str, tasks: &[Task]) -> String {
    let noun = if tasks.len() == 1 { "task" } else { "tasks" };
    let mut out = format!("{title}: {} {noun}\n", tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        out.push_str(&format!("  {}. {} [{}]\n", i + 1, task.title, rewards(task.rewards)));
        if !task.description.is_empty() {
            out.push_str(&format!("     {}\n", task.description));
        }
    }
    out.push_str(&format!("Total: {}\n", rewards(RewardPair::total(tasks))));
    out
}

fn tasks_json(tasks: &[Task]) -> Result<String, String> {
    serde_json::to_string_pretty(&json!({
        "tasks": tasks,
        "rewards": RewardPair::total(tasks),
    }))
    .map_err(|e| format!("Failed to serialize tasks: {e}"))
}

/// `"5 stars, 10 coins"`.
pub(crate) fn rewards(pair: RewardPair) -> String {
    format!("{} stars, {} coins", pair.stars, pair.coins)
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::goal::task;

    #[test]
    fn renders_numbered_tasks_with_total() {
        let tasks = vec![task("Tune", 5, 10), task("Chords", 5, 10), task("Song", 10, 20)];
        let out = render_tasks("Learn guitar", &tasks);

        assert!(out.starts_with("Learn guitar: 3 tasks\n"));
        assert!(out.contains("  1. Tune [5 stars, 10 coins]\n     Tune description\n"));
        assert!(out.contains("  3. Song [10 stars, 20 coins]"));
        assert!(out.ends_with("Total: 20 stars, 40 coins\n"));
    }

    #[test]
    fn singular_noun_for_one_task() {
        assert!(render_tasks("g", &[task("a", 1, 1)]).starts_with("g: 1 task\n"));
    }

    #[test]
    fn json_includes_total() {
        let raw = tasks_json(&[task("a", 1, 2), task("b", 3, 4)]).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["rewards"]["stars"], 4);
        assert_eq!(value["rewards"]["coins"], 6);
        assert_eq!(value["tasks"].as_array().map(Vec::len), Some(2));
    }
}
