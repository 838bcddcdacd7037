use std::time::Duration;

pub const DEFAULT_DATABASE: &str = "tallybook.db";
pub const DEFAULT_REPORT_PREFIX: &str = "financial_report";
pub const DEFAULT_SYNC_DELAY: Duration = Duration::from_millis(2000);

/// Runtime configuration for the finance service.
#[derive(Debug, Clone)]
pub struct Settings {
    /// SQLite file holding the key-value store
    pub database: String,
    /// First segment of exported file names
    pub report_prefix: String,
    /// How long the simulated cloud sync takes
    pub sync_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.into(),
            report_prefix: DEFAULT_REPORT_PREFIX.into(),
            sync_delay: DEFAULT_SYNC_DELAY,
        }
    }
}

impl Settings {
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_report_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.report_prefix = prefix.into();
        self
    }

    pub fn with_sync_delay(mut self, delay: Duration) -> Self {
        self.sync_delay = delay;
        self
    }
}
