//! The link list controller: the session's ordered view of the creator's
//! links, with optimistic reordering reconciled against the remote store.
//!
//! State sits behind an async mutex that is only held between awaits, so
//! operations started from different tasks may overlap. Each one acts on the
//! sequence current when it resumes and the last response to land wins.

use std::{collections::HashMap, sync::Arc};

use shared::{
    domain::LinkId,
    protocol::{Link, ReorderAck, ReorderRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, Result},
    ordering::{apply_confirmed, move_link, position_of, sort_by_order},
    store::LinkStore,
    validation::{LinkDraft, LinkPatch},
};

/// What happens to an optimistic reorder the store rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReorderFailurePolicy {
    /// Restore every link to its last confirmed rank.
    #[default]
    Rollback,
    /// Keep the optimistic sequence and flag the list for a reload.
    MarkStale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Ids were missing or identical; nothing was sent.
    Unchanged,
    Persisted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkListEvent {
    SequenceChanged(Vec<Link>),
    OperationFailed {
        operation: &'static str,
        message: String,
    },
    ResyncRequired,
}

struct LinkListState {
    sequence: Vec<Link>,
    /// Last rank the store acknowledged for each link.
    confirmed: HashMap<LinkId, f64>,
    pending_reorders: usize,
    needs_resync: bool,
}

impl LinkListState {
    fn confirm(&mut self, link: &Link) {
        self.confirmed.insert(link.id.clone(), link.order);
    }

    /// Puts back the confirmed rank of every link a rejected move touched.
    /// Other in-flight moves keep their optimistic ranks.
    fn restore_confirmed(&mut self, touched: &[(LinkId, f64)]) {
        for (id, _) in touched {
            let confirmed = self.confirmed.get(id).copied();
            let link = self.sequence.iter_mut().find(|link| &link.id == id);
            if let (Some(order), Some(link)) = (confirmed, link) {
                link.order = order;
            }
        }
        sort_by_order(&mut self.sequence);
    }

    /// Once no reorder is in flight the sequence must mirror confirmed ranks,
    /// unless it was flagged stale and is waiting for a reload.
    fn settle(&mut self) {
        if self.pending_reorders == 0 && !self.needs_resync {
            apply_confirmed(&mut self.sequence, &self.confirmed);
        }
    }
}

pub struct LinkListController {
    store: Arc<dyn LinkStore>,
    policy: ReorderFailurePolicy,
    inner: Mutex<LinkListState>,
    events: broadcast::Sender<LinkListEvent>,
}

impl LinkListController {
    pub fn new(store: Arc<dyn LinkStore>) -> Arc<Self> {
        Self::with_policy(store, ReorderFailurePolicy::default())
    }

    pub fn with_policy(store: Arc<dyn LinkStore>, policy: ReorderFailurePolicy) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            store,
            policy,
            inner: Mutex::new(LinkListState {
                sequence: Vec::new(),
                confirmed: HashMap::new(),
                pending_reorders: 0,
                needs_resync: false,
            }),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LinkListEvent> {
        self.events.subscribe()
    }

    pub async fn links(&self) -> Vec<Link> {
        self.inner.lock().await.sequence.clone()
    }

    pub async fn needs_resync(&self) -> bool {
        self.inner.lock().await.needs_resync
    }

    pub async fn pending_reorders(&self) -> usize {
        self.inner.lock().await.pending_reorders
    }

    /// Replaces the sequence with the store's links sorted by rank. On failure
    /// the previous sequence is kept.
    pub async fn load(&self) -> Result<Vec<Link>> {
        let mut links = self
            .store
            .list_links()
            .await
            .map_err(|err| self.report("load", err))?;
        sort_by_order(&mut links);

        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.confirmed = links
                .iter()
                .map(|link| (link.id.clone(), link.order))
                .collect();
            guard.sequence = links;
            guard.needs_resync = false;
            guard.sequence.clone()
        };
        info!(count = snapshot.len(), "link list loaded");
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    /// Moves `moved_id` into `target_id`'s slot immediately, then asks the
    /// store to persist the move.
    pub async fn reorder(&self, moved_id: &LinkId, target_id: &LinkId) -> Result<ReorderOutcome> {
        let (outcome, snapshot) = {
            let mut guard = self.inner.lock().await;
            let Some(outcome) = move_link(&mut guard.sequence, moved_id, target_id) else {
                debug!(%moved_id, %target_id, "reorder ignored");
                return Ok(ReorderOutcome::Unchanged);
            };
            guard.pending_reorders += 1;
            (outcome, guard.sequence.clone())
        };
        debug!(
            %moved_id,
            %target_id,
            from = outcome.from,
            to = outcome.to,
            "applied optimistic reorder"
        );
        self.publish(snapshot);

        let request = ReorderRequest {
            moved_id: moved_id.clone(),
            target_id: target_id.clone(),
        };
        let result = self.store.reorder_link(&request).await;

        let (snapshot, stale) = {
            let mut guard = self.inner.lock().await;
            guard.pending_reorders = guard.pending_reorders.saturating_sub(1);
            let mut stale = false;
            match &result {
                Ok(ack) => record_ack(&mut guard, ack, &outcome.ranks),
                Err(_) => match self.policy {
                    ReorderFailurePolicy::Rollback => {
                        guard.restore_confirmed(&outcome.ranks);
                    }
                    ReorderFailurePolicy::MarkStale => {
                        guard.needs_resync = true;
                        stale = true;
                    }
                },
            }
            guard.settle();
            (guard.sequence.clone(), stale)
        };

        match result {
            Ok(_) => {
                info!(%moved_id, %target_id, "reorder persisted");
                self.publish(snapshot);
                Ok(ReorderOutcome::Persisted)
            }
            Err(err) => {
                warn!(%moved_id, %target_id, policy = ?self.policy, "reorder rejected");
                self.publish(snapshot);
                if stale {
                    let _ = self.events.send(LinkListEvent::ResyncRequired);
                }
                Err(self.report("reorder", err))
            }
        }
    }

    /// Validates and creates a link, appending the stored entity.
    pub async fn add(&self, draft: &LinkDraft) -> Result<Link> {
        let new_link = draft
            .validate()
            .map_err(|err| self.report("add", err.into()))?;
        let created = self
            .store
            .create_link(&new_link)
            .await
            .map_err(|err| self.report("add", err))?;

        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.confirm(&created);
            guard.sequence.push(created.clone());
            guard.sequence.clone()
        };
        self.publish(snapshot);
        Ok(created)
    }

    /// Applies an edit and swaps in the store's copy of the link.
    pub async fn update(&self, id: &LinkId, patch: &LinkPatch) -> Result<Link> {
        let changes = patch
            .validate()
            .map_err(|err| self.report("update", err.into()))?;
        let updated = self
            .store
            .update_link(id, &changes)
            .await
            .map_err(|err| self.report("update", err))?;

        let snapshot = {
            let mut guard = self.inner.lock().await;
            match position_of(&guard.sequence, &updated.id) {
                Some(index) => {
                    guard.confirm(&updated);
                    if let Some(slot) = guard.sequence.get_mut(index) {
                        *slot = updated.clone();
                    }
                    guard.settle();
                }
                None => debug!(link_id = %updated.id, "updated link is no longer listed"),
            }
            guard.sequence.clone()
        };
        self.publish(snapshot);
        Ok(updated)
    }

    /// Deletes a link. A not-found answer still removes the local copy, since
    /// the link is gone either way, but is reported to the caller.
    pub async fn remove(&self, id: &LinkId) -> Result<()> {
        match self.store.delete_link(id).await {
            Ok(()) => {
                self.drop_local(id).await;
                Ok(())
            }
            Err(err) if err.is_not_found() => {
                debug!(link_id = %id, "link was already removed remotely");
                self.drop_local(id).await;
                Err(err)
            }
            Err(err) => Err(self.report("remove", err)),
        }
    }

    async fn drop_local(&self, id: &LinkId) {
        let snapshot = {
            let mut guard = self.inner.lock().await;
            guard.sequence.retain(|link| &link.id != id);
            guard.confirmed.remove(id);
            guard.sequence.clone()
        };
        self.publish(snapshot);
    }

    fn publish(&self, snapshot: Vec<Link>) {
        let _ = self.events.send(LinkListEvent::SequenceChanged(snapshot));
    }

    fn report(&self, operation: &'static str, err: ClientError) -> ClientError {
        warn!(operation, error = %err, "link operation failed");
        let _ = self.events.send(LinkListEvent::OperationFailed {
            operation,
            message: err.to_string(),
        });
        err
    }
}

fn record_ack(state: &mut LinkListState, ack: &ReorderAck, optimistic: &[(LinkId, f64)]) {
    if ack.links.is_empty() {
        for (id, order) in optimistic {
            if let Some(confirmed) = state.confirmed.get_mut(id) {
                *confirmed = *order;
            }
        }
        return;
    }
    for assignment in &ack.links {
        if let Some(order) = state.confirmed.get_mut(&assignment.id) {
            *order = assignment.order;
        }
    }
}

#[cfg(test)]
#[path = "tests/links_tests.rs"]
mod tests;
