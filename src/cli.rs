//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::goal::GoalDraft;

/// Top-level CLI parser for `grove`.
#[derive(Debug, Parser)]
#[command(name = "grove", version, about = "Create Guardian Grove goals with generated tasks")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate tasks for a goal and print them without saving.
    Generate(GoalArgs),
    /// Generate tasks, confirm, and save the goal.
    Create {
        /// Goal input.
        #[command(flatten)]
        goal: GoalArgs,
        /// Save without asking for confirmation.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show how a push notification payload would be presented.
    Notify {
        /// Payload file; reads stdin when omitted.
        file: Option<PathBuf>,
        /// Print the toast as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Goal input shared by `generate` and `create`.
#[derive(Debug, Clone, Args)]
pub struct GoalArgs {
    /// Goal title (1-100 characters).
    #[arg(long)]
    pub title: String,
    /// What the goal is about (1-500 characters).
    #[arg(long)]
    pub description: String,
    /// Optional due date, today or later.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub due: Option<NaiveDate>,
    /// Acting user; defaults to `GROVE_USER_ID`.
    #[arg(long)]
    pub user: Option<String>,
    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,
}

impl GoalArgs {
    /// The draft these arguments describe.
    #[must_use]
    pub fn draft(&self) -> GoalDraft {
        GoalDraft::new(self.title.clone(), self.description.clone(), self.due)
    }

    /// The acting user: `--user`, else the configured default.
    #[must_use]
    pub fn requester<'a>(&'a self, config: &'a Config) -> Option<&'a str> {
        self.user.as_deref().or(config.user_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use crate::config::Config;
    use chrono::NaiveDate;
    use clap::Parser;

    #[test]
    fn parses_generate_with_due_date() {
        let cli = Cli::parse_from([
            "grove",
            "generate",
            "--title",
            "Learn guitar",
            "--description",
            "Practice 30 min daily",
            "--due",
            "2026-11-01",
        ]);
        let Command::Generate(args) = cli.command else { panic!("expected generate") };
        assert_eq!(args.due, NaiveDate::from_ymd_opt(2026, 11, 1));
        assert_eq!(args.draft().title, "Learn guitar");
    }

    #[test]
    fn parses_create_with_yes() {
        let cli =
            Cli::parse_from(["grove", "create", "--title", "t", "--description", "d", "-y"]);
        assert!(matches!(cli.command, Command::Create { yes: true, .. }));
    }

    #[test]
    fn rejects_malformed_due_date() {
        let result = Cli::try_parse_from([
            "grove",
            "generate",
            "--title",
            "t",
            "--description",
            "d",
            "--due",
            "next week",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn user_flag_overrides_configured_requester() {
        let cli = Cli::parse_from(["grove", "generate", "--title", "t", "--description", "d"]);
        let Command::Generate(mut args) = cli.command else { panic!("expected generate") };
        let config = Config { user_id: Some("from-env".into()), ..Config::default() };

        assert_eq!(args.requester(&config), Some("from-env"));
        args.user = Some("from-flag".into());
        assert_eq!(args.requester(&config), Some("from-flag"));
    }
}
