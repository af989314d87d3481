//! Seams between the controllers and the remote API. `ApiClient` is the
//! production implementation; tests substitute in-memory stores.

use async_trait::async_trait;
use shared::{
    domain::{LeadMagnetId, LinkId},
    protocol::{
        LeadMagnet, Link, LinkChanges, NewLeadMagnet, NewLink, ReorderAck, ReorderRequest,
    },
};

use crate::error::Result;

#[async_trait]
pub trait LinkStore: Send + Sync {
    async fn list_links(&self) -> Result<Vec<Link>>;
    async fn create_link(&self, link: &NewLink) -> Result<Link>;
    async fn update_link(&self, id: &LinkId, changes: &LinkChanges) -> Result<Link>;
    /// Fails with `ClientError::NotFound` when the store has no such link.
    async fn delete_link(&self, id: &LinkId) -> Result<()>;
    async fn reorder_link(&self, request: &ReorderRequest) -> Result<ReorderAck>;
}

#[async_trait]
pub trait LeadMagnetStore: Send + Sync {
    async fn list_lead_magnets(&self) -> Result<Vec<LeadMagnet>>;
    async fn create_lead_magnet(&self, lead_magnet: &NewLeadMagnet) -> Result<LeadMagnet>;
    async fn replace_lead_magnet(
        &self,
        id: &LeadMagnetId,
        lead_magnet: &NewLeadMagnet,
    ) -> Result<LeadMagnet>;
    async fn delete_lead_magnet(&self, id: &LeadMagnetId) -> Result<()>;
}
