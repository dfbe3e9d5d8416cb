//! User-triggered command dispatch.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use crate::backend::{Backend, BackendError};
use crate::category::CategoryConfig;
use crate::entity::{Entity, SwitchState};
use crate::store::EntityStore;


/// Marker for the one in-flight activation a category may have.
///
/// The view renders this as the "loading" highlight on the requested scene.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingActivation {
    pub entity_id: String,
    pub requested_at: DateTime<Utc>,
}

/// Sends state-changing commands and merges the backend's echo back into the
/// entity store.
///
/// The store is only touched after backend confirmation; there is no
/// optimistic local commit. A failed command is dropped with the snapshot
/// unchanged, and the next poll reconciles whatever the backend actually did.
pub struct CommandDispatcher {
    backend: Arc<dyn Backend>,
    store: Arc<EntityStore>,

    /// At most one pending activation per category
    pending: DashMap<String, PendingActivation>,
}

impl CommandDispatcher {
    pub fn new(backend: Arc<dyn Backend>, store: Arc<EntityStore>) -> Self {
        Self {
            backend,
            store,
            pending: DashMap::new(),
        }
    }

    /// Requests a switch-like entity to move to `target`.
    ///
    /// On success the echoed state is patched into the store and the updated
    /// entity returned. Rapid repeated calls are tolerated; collapsing
    /// double-clicks is the view's concern.
    pub async fn toggle(
        &self,
        category: &CategoryConfig,
        id: &str,
        target: SwitchState,
    ) -> Result<Entity, BackendError> {
        debug!(
            category = %category.name,
            entity_id = %id,
            target = target.as_str(),
            "Dispatching toggle"
        );

        let entity = self.backend.toggle(category, id, target).await?;
        self.store
            .update_one(&category.name, &entity.id, entity.kind.clone());
        Ok(entity)
    }

    /// Activates a scene-like entity.
    ///
    /// The category's pending marker is set before the request goes out and
    /// cleared on every terminal outcome (success, failure, or the HTTP
    /// client's request timeout). A newer activation overwrites the marker;
    /// an older command's completion does not clear a marker it no longer
    /// owns.
    pub async fn activate(
        &self,
        category: &CategoryConfig,
        id: &str,
    ) -> Result<Entity, BackendError> {
        self.pending.insert(
            category.name.clone(),
            PendingActivation {
                entity_id: id.to_string(),
                requested_at: Utc::now(),
            },
        );

        debug!(category = %category.name, entity_id = %id, "Dispatching activation");

        let result = self.backend.activate(category, id).await;
        self.pending
            .remove_if(&category.name, |_, marker| marker.entity_id == id);

        let entity = result?;
        self.store
            .update_one(&category.name, &entity.id, entity.kind.clone());
        Ok(entity)
    }

    /// The activation currently awaiting a backend response, if any.
    pub fn pending_activation(&self, category: &str) -> Option<PendingActivation> {
        self.pending.get(category).map(|marker| marker.clone())
    }
}
