//! Retention sweep configuration.

use serde::{Deserialize, Serialize};

/// Default days an archived task survives before deletion.
const fn default_retention_days() -> u32 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionConfig {
    /// Days an archived task is retained past its effective date.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_retention_is_thirty_days() {
        assert_eq!(RetentionConfig::default().retention_days, 30);
    }
}
