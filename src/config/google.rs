use anyhow::Result;
use std::env;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Google sign-in configuration. Only the client id is needed server-side:
/// ID tokens are verified through the tokeninfo endpoint and checked
/// against this audience.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub tokeninfo_url: String,
}

impl GoogleConfig {
    pub fn from_env() -> Result<Self> {
        let client_id = env::var("GOOGLE_CLIENT_ID")
            .map_err(|_| anyhow::anyhow!("GOOGLE_CLIENT_ID environment variable must be set"))?;

        // Overridable so integration tests can point at a stub server.
        let tokeninfo_url =
            env::var("GOOGLE_TOKENINFO_URL").unwrap_or_else(|_| TOKENINFO_URL.to_string());

        Ok(Self {
            client_id,
            tokeninfo_url,
        })
    }
}
