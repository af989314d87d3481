use tracing::info;

use crate::{api::ApiClient, error::Result, validation::ProfileDraft};

const USERS_ONBOARD: &str = "/api/users/onboard";
const USERS_PROFILE: &str = "/api/users/profile";

impl ApiClient {
    /// Completes first-run onboarding. Invalid drafts are rejected before any
    /// request is made.
    pub async fn onboard(&self, draft: &ProfileDraft) -> Result<()> {
        let payload = draft.validate()?;
        self.send(USERS_ONBOARD, self.post(USERS_ONBOARD).json(&payload), None)
            .await?;
        info!(username = %payload.username, niche = %payload.niche, "onboarding complete");
        Ok(())
    }

    pub async fn update_profile(&self, draft: &ProfileDraft) -> Result<()> {
        let payload = draft.validate()?;
        self.send(USERS_PROFILE, self.put(USERS_PROFILE).json(&payload), None)
            .await?;
        info!(username = %payload.username, "profile updated");
        Ok(())
    }
}
