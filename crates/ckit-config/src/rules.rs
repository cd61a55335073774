//! Rule file location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RulesConfig {
    /// `.toml` or `.json` rule file. Relative paths resolve against the
    /// working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl RulesConfig {
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.path.is_some()
    }
}
