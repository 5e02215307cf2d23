use crate::bootstrap::AppContext;
use crate::cli::{Commands, GlobalFlags};

pub mod scan;
pub mod shared;
pub mod sweep;
pub mod task;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Task { action } => task::handle(action, ctx, flags).await,
        Commands::Scan { today } => scan::handle(today.as_deref(), ctx, flags).await,
        Commands::Sweep { today } => sweep::handle(today.as_deref(), ctx, flags).await,
    }
}
