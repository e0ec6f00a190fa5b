//! Platform credentials

use base64::Engine;
use pulseboard_core::models::Platform;

use crate::{Error, Result};

const KEYRING_SERVICE: &str = "pulseboard";

/// How a client authenticates its requests.
#[derive(Clone)]
pub enum Credentials {
    /// Jira (`email:api_token`) and Azure DevOps (empty user, PAT)
    Basic { username: String, token: String },
    /// GitHub personal access or app token
    Bearer(String),
}

impl Credentials {
    pub fn basic(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// Value for the `Authorization` header
    pub fn header_value(&self) -> String {
        match self {
            Credentials::Basic { username, token } => {
                let credentials = format!("{}:{}", username, token);
                format!(
                    "Basic {}",
                    base64::engine::general_purpose::STANDARD.encode(credentials)
                )
            }
            Credentials::Bearer(token) => format!("Bearer {}", token),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("token", &"***")
                .finish(),
            Credentials::Bearer(_) => f.debug_tuple("Bearer").field(&"***").finish(),
        }
    }
}

/// `PULSEBOARD_GITHUB_TOKEN`, `PULSEBOARD_AZUREDEVOPS_TOKEN`, `PULSEBOARD_JIRA_TOKEN`
pub fn token_env_var(platform: Platform) -> String {
    format!("PULSEBOARD_{}_TOKEN", platform.key().to_uppercase())
}

/// Find the API token for a platform: environment first, then the OS keyring.
pub fn resolve_token(platform: Platform) -> Result<String> {
    let var = token_env_var(platform);
    if let Ok(token) = std::env::var(&var)
        && !token.trim().is_empty()
    {
        return Ok(token.trim().to_string());
    }

    let entry = keyring::Entry::new(KEYRING_SERVICE, platform.key())?;
    match entry.get_password() {
        Ok(token) => Ok(token),
        Err(keyring::Error::NoEntry) => Err(Error::Auth(format!(
            "No {} token found; set {} or store one in the keyring",
            platform, var
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Save a platform token in the OS keyring.
pub fn store_token(platform: Platform, token: &str) -> Result<()> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, platform.key())?;
    entry.set_password(token)?;
    Ok(())
}
