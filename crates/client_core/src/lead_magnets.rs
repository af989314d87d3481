//! Lead magnets: downloadable resources listed in server order.

use std::sync::Arc;

use shared::{domain::LeadMagnetId, protocol::LeadMagnet};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{error::Result, store::LeadMagnetStore, validation::LeadMagnetDraft};

pub struct LeadMagnetController {
    store: Arc<dyn LeadMagnetStore>,
    items: Mutex<Vec<LeadMagnet>>,
}

impl LeadMagnetController {
    pub fn new(store: Arc<dyn LeadMagnetStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            items: Mutex::new(Vec::new()),
        })
    }

    pub async fn lead_magnets(&self) -> Vec<LeadMagnet> {
        self.items.lock().await.clone()
    }

    pub async fn load(&self) -> Result<Vec<LeadMagnet>> {
        let fetched = self.store.list_lead_magnets().await.map_err(|err| {
            warn!(error = %err, "failed to load lead magnets");
            err
        })?;
        let mut guard = self.items.lock().await;
        *guard = fetched;
        info!(count = guard.len(), "lead magnets loaded");
        Ok(guard.clone())
    }

    pub async fn add(&self, draft: &LeadMagnetDraft) -> Result<LeadMagnet> {
        let new_lead_magnet = draft.validate()?;
        let created = self.store.create_lead_magnet(&new_lead_magnet).await?;
        self.items.lock().await.push(created.clone());
        Ok(created)
    }

    /// Replaces every editable field; the store answers with the stored copy.
    pub async fn update(&self, id: &LeadMagnetId, draft: &LeadMagnetDraft) -> Result<LeadMagnet> {
        let replacement = draft.validate()?;
        let updated = self.store.replace_lead_magnet(id, &replacement).await?;
        let mut guard = self.items.lock().await;
        if let Some(slot) = guard.iter_mut().find(|item| item.id == updated.id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Same not-found semantics as link removal: the local copy goes, the
    /// error is still returned.
    pub async fn remove(&self, id: &LeadMagnetId) -> Result<()> {
        match self.store.delete_lead_magnet(id).await {
            Ok(()) => {
                self.drop_local(id).await;
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                debug!(lead_magnet_id = %id, "lead magnet was already removed remotely");
                self.drop_local(id).await;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn drop_local(&self, id: &LeadMagnetId) {
        self.items.lock().await.retain(|item| &item.id != id);
    }
}

#[cfg(test)]
#[path = "tests/lead_magnets_tests.rs"]
mod tests;
