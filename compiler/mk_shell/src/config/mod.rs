//! Optimizer configuration.
//!
//! Built once before any command is compacted and never changed afterwards.
//! The optimizer owns its copy; nothing here is global.

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::ConfigError;


/// Leaf file names the leaf search handles unless configured otherwise.
pub const DEFAULT_LEAF_NAMES: &[&str] = &["CleanSpec.mk", "Android.mk"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShellConfig {
    shell_date: Option<NaiveDateTime>,
    leaf_names: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            shell_date: None,
            leaf_names: DEFAULT_LEAF_NAMES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ShellConfig {
    /// Fix the timestamp `$(shell date ...)` reports. Without one, date
    /// commands always run for real.
    #[must_use]
    pub fn with_shell_date(mut self, timestamp: NaiveDateTime) -> Self {
        self.shell_date = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_leaf_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leaf_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn shell_date(&self) -> Option<NaiveDateTime> {
        self.shell_date
    }

    pub fn leaf_names(&self) -> &[String] {
        &self.leaf_names
    }

    pub fn is_leaf_name(&self, name: &str) -> bool {
        self.leaf_names.iter().any(|n| n == name)
    }
}

/// Parse a reference timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD`
/// (midnight).
pub fn parse_shell_date(input: &str) -> Result<NaiveDateTime, ConfigError> {
    let input = input.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ConfigError::InvalidShellDate {
            input: input.to_string(),
        })
}
