use rmd_service::ReminderScanner;

use crate::bootstrap::AppContext;
use crate::cli::GlobalFlags;
use crate::commands::shared::resolve_today;
use crate::output::output;

/// Handle `rmd scan`.
pub async fn handle(
    today: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let today = resolve_today(today)?;
    let outcome = ReminderScanner::new(&ctx.db, &ctx.mailer).run(today).await?;
    output(&outcome, flags.format)
}
