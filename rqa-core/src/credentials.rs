//! Credential resolution from environment variables.
//!
//! Secrets are looked up at call time and never cached or written anywhere.
//! A missing or empty variable is fatal: the resulting
//! [`QaError::MissingCredential`] is always propagated to the caller.

use crate::error::{QaError, Result};

/// AWS credential pair.
///
/// The secret key is redacted from debug output.
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Resolves named secrets from process environment state.
///
/// The variable name backing each secret can be rebound with
/// [`CredentialsManager::rebind`], which is how test setups point the
/// manager at scratch variables.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    aws_access_key_env: String,
    aws_secret_key_env: String,
    openai_api_key_env: String,
}

impl Default for CredentialsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialsManager {
    /// Create a manager with the default environment variable names.
    pub fn new() -> Self {
        Self {
            aws_access_key_env: "AWS_ACCESS_KEY_ID".to_string(),
            aws_secret_key_env: "AWS_SECRET_ACCESS_KEY".to_string(),
            openai_api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }

    /// Retrieve the AWS credential pair.
    pub fn get_aws_credentials(&self) -> Result<AwsCredentials> {
        let access_key_id = required(&self.aws_access_key_env)?;
        let secret_access_key = required(&self.aws_secret_key_env)?;
        Ok(AwsCredentials { access_key_id, secret_access_key })
    }

    /// Retrieve the OpenAI API key.
    pub fn get_openai_api_key(&self) -> Result<String> {
        required(&self.openai_api_key_env)
    }

    /// Rebind which environment variable backs each secret. `None` leaves
    /// the current binding in place.
    pub fn rebind(
        &mut self,
        aws_access_key_env: Option<&str>,
        aws_secret_key_env: Option<&str>,
        openai_api_key_env: Option<&str>,
    ) {
        if let Some(name) = aws_access_key_env {
            self.aws_access_key_env = name.to_string();
        }
        if let Some(name) = aws_secret_key_env {
            self.aws_secret_key_env = name.to_string();
        }
        if let Some(name) = openai_api_key_env {
            self.openai_api_key_env = name.to_string();
        }
        tracing::info!("rebound credential environment variable names");
    }
}

/// Read a required variable. Empty values count as unset.
fn required(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(QaError::MissingCredential(name.to_string())),
    }
}
