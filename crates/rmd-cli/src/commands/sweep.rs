use rmd_service::RetentionSweeper;

use crate::bootstrap::AppContext;
use crate::cli::GlobalFlags;
use crate::commands::shared::resolve_today;
use crate::output::output;

/// Handle `rmd sweep`.
pub async fn handle(
    today: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let today = resolve_today(today)?;
    let summary = RetentionSweeper::new(&ctx.db, ctx.lifecycle_policy())
        .run(today)
        .await?;
    output(&summary, flags.format)
}
