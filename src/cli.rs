use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "bli",
    about = "Bullet LIst, a simple, journalised todo list.",
    long_about = "Bullet LIst keeps one page of tasks per day. On the first run of a new day, unfinished tasks from the previous page are marked postponed, copied onto today's page and the previous page is moved to the archive.\n\nIndices shown in the listing address tasks for -v/-x/-r/-p.",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    /// Load configuration from PATH instead of ~/.config/bli.yml.
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Use PATH as the journal root instead of the configured one.
    #[arg(short = 'j', long = "journal", global = true, value_name = "PATH")]
    pub(crate) journal: Option<PathBuf>,

    /// Treat DATE (YYYY-MM-DD) as today.
    #[arg(long = "today", global = true, value_name = "DATE", hide = true)]
    pub(crate) today: Option<String>,

    /// List tasks of every status, not only pending ones.
    #[arg(long = "all", overrides_with = "no_all")]
    pub(crate) all: bool,

    #[arg(long = "no-all", overrides_with = "all", hide = true)]
    pub(crate) no_all: bool,

    /// Only list tasks matching TEXT, or /REGEX/ (repeatable, case-insensitive).
    #[arg(short = 'f', long = "filter", action = ArgAction::Append, value_name = "EXPR", allow_hyphen_values = true)]
    pub(crate) filter: Vec<String>,

    /// Add a pending task (repeatable).
    #[arg(short = 'a', long = "add", action = ArgAction::Append, value_name = "TEXT", allow_hyphen_values = true)]
    pub(crate) add: Vec<String>,

    /// Mark task INDEX as erased (repeatable).
    #[arg(short = 'x', long = "cross", action = ArgAction::Append, value_name = "INDEX", allow_negative_numbers = true)]
    pub(crate) cross: Vec<i64>,

    /// Mark task INDEX as pending again (repeatable).
    #[arg(short = 'r', long = "restore", action = ArgAction::Append, value_name = "INDEX", allow_negative_numbers = true)]
    pub(crate) restore: Vec<i64>,

    /// Mark task INDEX as done (repeatable).
    #[arg(short = 'v', long = "check", action = ArgAction::Append, value_name = "INDEX", allow_negative_numbers = true)]
    pub(crate) check: Vec<i64>,

    /// Mark task INDEX as postponed (repeatable).
    #[arg(short = 'p', long = "postpone", action = ArgAction::Append, value_name = "INDEX", allow_negative_numbers = true)]
    pub(crate) postpone: Vec<i64>,

    /// Number listed tasks 0.. instead of by their position on the page.
    #[arg(long = "renumber")]
    pub(crate) renumber: bool,

    #[command(subcommand)]
    pub(crate) command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CliCommand {
    #[command(about = "Check the journal for stale pages and corrupt task lines without changing it.")]
    /// Check the journal for stale pages and corrupt task lines without changing it.
    Doctor,
}
