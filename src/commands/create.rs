//! `grove create` command.

use std::io::{BufRead, Write};

use crate::cli::GoalArgs;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::goal::Goal;
use crate::workflow::GoalWorkflow;

use super::generate::{render_tasks, rewards};
use super::workflow_options;

/// Execute the `create` command: generate tasks, confirm, then save the goal.
///
/// Without `yes`, the user is asked on stdin before anything is saved.
///
/// # Errors
///
/// Returns the user-facing workflow error if generation or saving fails.
pub async fn run(
    ctx: &ServiceContext,
    config: &Config,
    args: &GoalArgs,
    yes: bool,
) -> Result<(), String> {
    let (workflow, _completion) = GoalWorkflow::with_context(ctx, workflow_options(config));
    let draft = args.draft();
    let requester = args.requester(config);

    workflow.generate_tasks(&draft, requester).await.map_err(|e| e.to_string())?;

    if !yes {
        let state = workflow.state();
        eprint!("{}", render_tasks(&state.title, &state.tasks));
        let stdin = std::io::stdin();
        if !confirm(&mut stdin.lock(), &mut std::io::stderr(), "Save this goal? [y/N] ")? {
            workflow.close();
            eprintln!("Goal discarded.");
            return Ok(());
        }
    }

    let goal = workflow.save_goal(&draft, requester).await.map_err(|e| e.to_string())?;
    if args.json {
        let raw = serde_json::to_string_pretty(&goal)
            .map_err(|e| format!("Failed to serialize goal: {e}"))?;
        println!("{raw}");
    } else {
        print!("{}", render_goal(&goal));
    }
    Ok(())
}

/// Asks `prompt` and reads a yes/no answer; anything but `y`/`yes` is no.
fn confirm<R, W>(input: &mut R, output: &mut W, prompt: &str) -> Result<bool, String>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{prompt}").and_then(|()| output.flush()).map_err(|e| e.to_string())?;
    let mut answer = String::new();
    input.read_line(&mut answer).map_err(|e| format!("Failed to read answer: {e}"))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn render_goal(goal: &Goal) -> String {
    let mut out = format!("Created goal {} ({})\n", goal.title, goal.id);
    if let Some(due) = goal.due_date {
        out.push_str(&format!("Due: {due}\n"));
    }
    for (i, task) in goal.tasks.iter().enumerate() {
        out.push_str(&format!("  {}. {} [{}]\n", i + 1, task.title, rewards(task.rewards)));
    }
    out.push_str(&format!("Total: {}\n", rewards(goal.rewards)));
    out
}
