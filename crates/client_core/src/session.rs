//! Sign-in, current-user lookup and sign-out. The OAuth code exchange itself
//! happens server-side; the client only forwards the callback code.

use shared::protocol::{AuthResponse, LoginRequest, User};
use tracing::info;

use crate::{
    api::ApiClient,
    error::{ClientError, Result, ValidationError},
};

const AUTH_GITHUB: &str = "/api/auth/github";
const AUTH_ME: &str = "/api/auth/me";
const AUTH_LOGOUT: &str = "/api/auth/logout";

/// Where the dashboard sends a user after authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Onboarding,
    Dashboard,
}

pub fn landing_for(user: &User) -> Landing {
    if user.onboarded {
        Landing::Dashboard
    } else {
        Landing::Onboarding
    }
}

impl ApiClient {
    /// Exchanges an OAuth callback code for a session. A token returned by the
    /// server replaces the context's bearer token.
    pub async fn login(&mut self, code: &str) -> Result<AuthResponse> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ClientError::Validation(ValidationError::new(
                "code",
                "is required",
            )));
        }

        let response: AuthResponse = self
            .send_json(
                AUTH_GITHUB,
                self.post(AUTH_GITHUB).json(&LoginRequest {
                    code: code.to_string(),
                }),
                None,
            )
            .await?;
        if response.token.is_some() {
            self.set_bearer_token(response.token.clone());
        }
        info!(
            user_id = %response.user.id,
            onboarded = response.user.onboarded,
            "signed in"
        );
        Ok(response)
    }

    pub async fn current_user(&self) -> Result<User> {
        self.send_json(AUTH_ME, self.get(AUTH_ME), None).await
    }

    pub async fn logout(&mut self) -> Result<()> {
        self.send(AUTH_LOGOUT, self.post(AUTH_LOGOUT), None).await?;
        self.set_bearer_token(None);
        info!("signed out");
        Ok(())
    }
}
