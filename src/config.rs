use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".invoice-tracker";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "invoices.sqlite";
/// How long a statement waits on a locked database before giving up.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the store lives and how patient each connection is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    /// Applied to every connection; bounds both opening and running a query
    /// while another writer holds the lock.
    pub busy_timeout: Duration,
}

impl Config {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    /// Default location inside the user's home directory. Returns `None` when
    /// no home directory can be resolved.
    pub fn default_location() -> Option<Self> {
        let base_dirs = BaseDirs::new()?;
        Some(Self::new(
            base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME),
        ))
    }
}
