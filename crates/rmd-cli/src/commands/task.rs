use anyhow::Context;
use serde::Serialize;

use rmd_core::{RecurrenceKind, RecurrenceRule, Task, TaskState, Weekday};
use rmd_db::update::{TaskUpdate, TaskUpdateBuilder};
use rmd_service::{CreateTaskRequest, TaskService};

use crate::bootstrap::AppContext;
use crate::cli::subcommands::TaskCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::{parse_enum, resolve_today};
use crate::output::output;

/// Handle `rmd task`.
pub async fn handle(
    action: TaskCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = TaskService::new(&ctx.db, &ctx.mailer);

    match action {
        TaskCommands::Add {
            owner,
            title,
            description,
            emails,
            due,
            end,
            start_time,
            repeat,
            start_weekday,
            interval_weeks,
        } => {
            let request = CreateTaskRequest {
                owner_id: owner,
                title,
                description,
                responsible_emails: emails,
                due_date: due,
                end_date: end,
                start_time,
                repeat,
                start_weekday,
                interval_weeks,
                state: None,
            };
            let created = service.create(request, resolve_today(None)?).await?;
            if created.dispatch_attempted && !flags.quiet {
                eprintln!("task is due today; a reminder was dispatched");
            }
            output(&created.task, flags.format)
        }
        TaskCommands::List { owner } => {
            let tasks = service.list(&owner).await?;
            // The table view gets human-readable labels; json/raw keep the
            // full structure.
            if flags.format == OutputFormat::Table {
                let rows = tasks.iter().map(TaskRow::from).collect::<Vec<_>>();
                output(&rows, flags.format)
            } else {
                output(&tasks, flags.format)
            }
        }
        TaskCommands::Update {
            id,
            owner,
            acting_as,
            title,
            description,
            emails,
            due,
            end,
            clear_end,
            start_time,
            state,
            repeat,
            start_weekday,
            interval_weeks,
        } => {
            let update = build_update(UpdateArgs {
                title,
                description,
                emails,
                due,
                end,
                clear_end,
                start_time,
                state,
                repeat,
                start_weekday,
                interval_weeks,
            })?;
            anyhow::ensure!(!update.is_empty(), "no fields to update");

            let principal = acting_as.unwrap_or_else(|| owner.clone());
            let task = service.update(&principal, &owner, &id, update).await?;
            output(&task, flags.format)
        }
        TaskCommands::Complete {
            id,
            owner,
            acting_as,
        } => {
            let principal = acting_as.unwrap_or_else(|| owner.clone());
            let task = service.complete(&principal, &owner, &id).await?;
            output(&task, flags.format)
        }
    }
}

/// One task flattened for table listing.
#[derive(Debug, Serialize)]
struct TaskRow {
    id: String,
    title: String,
    due: String,
    end: String,
    state: String,
    recurrence: String,
    emails: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            due: task.due_date.to_string(),
            end: task.end_date.map(|d| d.to_string()).unwrap_or_default(),
            state: task.state.to_string(),
            recurrence: task.recurrence.describe(),
            emails: task.responsible_emails.join(", "),
        }
    }
}

struct UpdateArgs {
    title: Option<String>,
    description: Option<String>,
    emails: Vec<String>,
    due: Option<String>,
    end: Option<String>,
    clear_end: bool,
    start_time: Option<String>,
    state: Option<String>,
    repeat: Option<String>,
    start_weekday: Option<u8>,
    interval_weeks: Option<u32>,
}

fn build_update(args: UpdateArgs) -> anyhow::Result<TaskUpdate> {
    let mut builder = TaskUpdateBuilder::new();

    if let Some(title) = args.title {
        builder = builder.title(title);
    }
    if let Some(description) = args.description {
        builder = builder.description(description);
    }
    if !args.emails.is_empty() {
        builder = builder.responsible_emails(args.emails);
    }
    if let Some(due) = args.due {
        builder = builder.due_date(parse_date(&due, "--due")?);
    }
    if args.clear_end {
        builder = builder.end_date(None);
    } else if let Some(end) = args.end {
        builder = builder.end_date(Some(parse_date(&end, "--end")?));
    }
    if let Some(start_time) = args.start_time {
        builder = builder.start_time(Some(start_time));
    }
    if let Some(state) = args.state {
        builder = builder.state(parse_enum::<TaskState>(&state, "state")?);
    }
    if let Some(repeat) = args.repeat {
        let kind: RecurrenceKind = repeat.parse()?;
        let recurrence = if kind == RecurrenceKind::Weekly {
            let weekday = args.start_weekday.unwrap_or(1);
            let weekday = Weekday::from_number(weekday)
                .with_context(|| format!("invalid --start-weekday {weekday}: expected 1..=7"))?;
            RecurrenceRule::weekly(weekday, args.interval_weeks.unwrap_or(1))
        } else {
            RecurrenceRule {
                kind,
                ..RecurrenceRule::none()
            }
        };
        builder = builder.recurrence(recurrence);
    }

    Ok(builder.build())
}

fn parse_date(value: &str, flag: &str) -> anyhow::Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("invalid {flag} '{value}': expected YYYY-MM-DD"))
}
