use serde::{Deserialize, Serialize};

/// Configuration for the user_directory module (`modules.user_directory`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserDirectoryConfig {
    /// Base URL of the ViaCEP-compatible postal service.
    #[serde(default = "default_postal_base_url")]
    pub postal_base_url: String,
    #[serde(default = "default_postal_timeout_ms")]
    pub postal_timeout_ms: u64,
}

impl Default for UserDirectoryConfig {
    fn default() -> Self {
        Self {
            postal_base_url: default_postal_base_url(),
            postal_timeout_ms: default_postal_timeout_ms(),
        }
    }
}

fn default_postal_base_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

fn default_postal_timeout_ms() -> u64 {
    5_000
}
