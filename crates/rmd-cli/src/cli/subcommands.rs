use clap::Subcommand;

/// Task entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Add {
        #[arg(long)]
        owner: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Responsible email; repeat the flag for multiple recipients.
        #[arg(long = "email", value_name = "ADDRESS", required = true)]
        emails: Vec<String>,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: String,
        /// Optional end date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,
        /// Optional start time (HH:MM).
        #[arg(long)]
        start_time: Option<String>,
        /// Recurrence: none, daily, weekly, monthly, yearly.
        #[arg(long, default_value = "none")]
        repeat: String,
        /// Weekly only: anchor weekday, Monday-first 1..=7.
        #[arg(long)]
        start_weekday: Option<u8>,
        /// Weekly only: weeks between occurrences.
        #[arg(long)]
        interval_weeks: Option<u32>,
    },
    /// List an owner's tasks.
    List {
        #[arg(long)]
        owner: String,
    },
    /// Update a task.
    Update {
        id: String,
        #[arg(long)]
        owner: String,
        /// Acting principal; must own the task. Defaults to --owner.
        #[arg(long = "as")]
        acting_as: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replacement recipient list; repeat the flag for multiple.
        #[arg(long = "email", value_name = "ADDRESS")]
        emails: Vec<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, conflicts_with = "clear_end")]
        end: Option<String>,
        /// Remove the end date.
        #[arg(long)]
        clear_end: bool,
        #[arg(long)]
        start_time: Option<String>,
        /// New state: pending, completed, archived (forward only).
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        repeat: Option<String>,
        #[arg(long)]
        start_weekday: Option<u8>,
        #[arg(long)]
        interval_weeks: Option<u32>,
    },
    /// Mark a task completed.
    Complete {
        id: String,
        #[arg(long)]
        owner: String,
        /// Acting principal; must own the task. Defaults to --owner.
        #[arg(long = "as")]
        acting_as: Option<String>,
    },
}
