//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Settings for validating sessions issued by the hosted auth service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Project JWT secret (HMAC-SHA256). When set, access tokens are
    /// verified locally before the auth service is asked about them.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Allowed clock skew in seconds for token expiry checks.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Redirect target embedded in magic-link e-mails.
    #[serde(default)]
    pub magic_link_redirect: Option<String>,
    /// Account created at startup when the in-process backend is used.
    #[serde(default)]
    pub demo_email: Option<String>,
    /// Password of the demo account.
    #[serde(default)]
    pub demo_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            leeway_seconds: default_leeway(),
            magic_link_redirect: None,
            demo_email: None,
            demo_password: None,
        }
    }
}

fn default_leeway() -> u64 {
    5
}
