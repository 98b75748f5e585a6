use crate::api::SynthesisClient;
use crate::error::MenuError;
use crate::prefs::{Credential, PreferenceStore};
use tracing::info;

/// Two-step token handshake: an email yields a token delivered out-of-band,
/// which the user re-enters to authorize audio requests.
pub struct LoginFlow<'a> {
    client: &'a SynthesisClient,
    prefs: &'a PreferenceStore,
}

impl<'a> LoginFlow<'a> {
    pub fn new(client: &'a SynthesisClient, prefs: &'a PreferenceStore) -> Self {
        Self { client, prefs }
    }

    /// Step one. Returns the service's confirmation message; nothing is stored.
    pub async fn request_token(&self, email: &str) -> Result<String, MenuError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(MenuError::InvalidInput("Please, introduce your email.".to_string()));
        }
        let reply = self.client.issue_token(email).await?;
        if !reply.is_success() {
            return Err(MenuError::Remote {
                code: reply.code,
                message: reply.message,
            });
        }
        Ok(reply.message)
    }

    /// Step two: persist the email and the token the user received.
    pub async fn confirm_token(&self, email: &str, token: &str) -> Result<(), MenuError> {
        let (email, token) = (email.trim(), token.trim());
        if email.is_empty() || token.is_empty() {
            return Err(MenuError::InvalidInput(
                "Please, introduce your email and token.".to_string(),
            ));
        }
        self.prefs.write_credential(email, token).await?;
        info!(email, "logged in");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), MenuError> {
        self.prefs.clear_credential().await
    }

    pub async fn current(&self) -> Result<Credential, MenuError> {
        self.prefs.read().await
    }
}
