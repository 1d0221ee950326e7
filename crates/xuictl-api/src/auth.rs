// Panel authentication
//
// Username/password login. The panel answers with the usual envelope and
// sets a `session` cookie; the cookie, not the envelope, is the proof of
// login. The token is stored in the shared session state so every
// sub-client built on the same `Session` becomes authenticated.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info};

use crate::client::{Check, Method, PanelClient};
use crate::error::Error;

/// Login endpoint, relative to the host.
pub const LOGIN_PATH: &str = "login";

impl PanelClient {
    /// Exchange the session's credentials for a session token.
    ///
    /// Envelope validation is always enforced here. A successful envelope
    /// without a `session` cookie is an [`Error::Authentication`] and
    /// leaves the stored token untouched.
    pub async fn login(&self) -> Result<(), Error> {
        let username = self.session().username();
        let body = json!({
            "username": username,
            "password": self.session().password().expose_secret(),
        });

        info!(%username, "logging in");

        let resp = self
            .send(Method::Post, LOGIN_PATH, Some(&body), Check::Envelope)
            .await?;

        let Some(token) = resp.session_cookie() else {
            return Err(Error::Authentication {
                message: "no session cookie received from the panel".into(),
            });
        };

        self.session()
            .set_session_token(SecretString::from(token.to_owned()));
        info!(%username, "session cookie retrieved");
        Ok(())
    }

    /// Forget the local session token. The panel is not contacted.
    pub fn logout(&self) {
        debug!("clearing session token");
        self.session().clear_session_token();
    }
}
