//! Startup wiring: configuration, database, and mail transport.

use anyhow::Context;

use rmd_config::RemindConfig;
use rmd_core::LifecyclePolicy;
use rmd_db::TaskDb;
use rmd_mailer::SmtpMailer;

/// Everything a command handler needs, wired once at startup.
pub struct AppContext {
    pub config: RemindConfig,
    pub db: TaskDb,
    pub mailer: SmtpMailer,
}

impl AppContext {
    pub async fn init() -> anyhow::Result<Self> {
        let config = RemindConfig::load_with_dotenv().context("failed to load configuration")?;

        let db = TaskDb::open_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database at '{}'", config.database.path))?;

        let mailer =
            SmtpMailer::from_config(&config.smtp).context("failed to build SMTP transport")?;
        if !config.smtp.is_configured() {
            tracing::warn!("smtp is not configured; reminders will be logged instead of sent");
        }

        Ok(Self { config, db, mailer })
    }

    /// Retention policy from configuration.
    #[must_use]
    pub const fn lifecycle_policy(&self) -> LifecyclePolicy {
        LifecyclePolicy {
            retention_days: self.config.retention.retention_days,
        }
    }
}
