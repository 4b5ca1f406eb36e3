//! List screen defaults.

use serde::{Deserialize, Serialize};

/// Defaults applied when a screen mounts a list without explicit parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Rows per page when the caller does not ask for a size.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound accepted for `page_size`.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}
