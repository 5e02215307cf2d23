use clap::Subcommand;

use super::subcommands::TaskCommands;

/// Root commands for the `rmd` binary.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Manage tasks.
    Task {
        #[command(subcommand)]
        action: TaskCommands,
    },
    /// Scan for tasks due today, email their reminders, and advance
    /// recurring reminder dates.
    Scan {
        /// Evaluation date (YYYY-MM-DD, defaults to the local date)
        #[arg(long)]
        today: Option<String>,
    },
    /// Advance task lifecycles and delete archived tasks past the
    /// retention window.
    Sweep {
        /// Evaluation date (YYYY-MM-DD, defaults to the local date)
        #[arg(long)]
        today: Option<String>,
    },
}
