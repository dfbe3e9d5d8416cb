//! View-facing facade over the sync core.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

use crate::category::{CategoryConfig, CategoryKind};
use crate::command::{CommandDispatcher, PendingActivation};
use crate::entity::{Entity, SwitchState};
use crate::scene::{self, SceneOrder};
use crate::store::{CategorySnapshot, EntityStore, StoreUpdate};

#[cfg(test)]
mod tests;

/// Read-only snapshot access and user-intent hooks for a presentation layer.
///
/// The view renders from `snapshot` / `ordered_scenes` and wires clicks to
/// `on_toggle` / `on_activate`. Command failures are logged and swallowed
/// here, so a click can never crash the view; the snapshot simply keeps its
/// pre-command contents until the next poll.
pub struct Dashboard {
    store: Arc<EntityStore>,
    dispatcher: Arc<CommandDispatcher>,
    scene_order: SceneOrder,
    categories: Vec<CategoryConfig>,
}

impl Dashboard {
    pub fn new(
        store: Arc<EntityStore>,
        dispatcher: Arc<CommandDispatcher>,
        scene_order: SceneOrder,
        categories: Vec<CategoryConfig>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            scene_order,
            categories,
        }
    }

    /// Descriptor lookup by category name.
    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Current snapshot for a category.
    pub fn snapshot(&self, category: &str) -> Option<CategorySnapshot> {
        self.store.snapshot(category)
    }

    /// Snapshot with the scene display ordering applied.
    pub fn ordered_scenes(&self, category: &str) -> Option<CategorySnapshot> {
        match self.store.snapshot(category)? {
            CategorySnapshot::Loading => Some(CategorySnapshot::Loading),
            CategorySnapshot::Loaded(entities) => Some(CategorySnapshot::Loaded(
                self.scene_order.order(&entities),
            )),
        }
    }

    /// The most recently activated scene of a category, once loaded.
    pub fn active_scene(&self, category: &str) -> Option<Entity> {
        match self.store.snapshot(category)? {
            CategorySnapshot::Loading => None,
            CategorySnapshot::Loaded(entities) => scene::currently_active(&entities).cloned(),
        }
    }

    /// The activation awaiting a backend response in a category, if any.
    pub fn pending_activation(&self, category: &str) -> Option<PendingActivation> {
        self.dispatcher.pending_activation(category)
    }

    /// Subscribe to snapshot change notifications; the view re-renders the
    /// named category on each update.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.store.subscribe()
    }

    /// Click hook for switch-like entries.
    pub async fn on_toggle(&self, category: &str, id: &str, target: SwitchState) {
        let descriptor = match self.category(category) {
            Some(descriptor) => descriptor,
            None => {
                warn!(category = %category, "Toggle for unknown category");
                return;
            }
        };

        if descriptor.kind != CategoryKind::Switch {
            warn!(category = %category, entity_id = %id, "Toggle on a scene-like category");
            return;
        }

        if let Err(e) = self.dispatcher.toggle(descriptor, id, target).await {
            warn!(
                category = %category,
                entity_id = %id,
                error = %e,
                "Toggle command dropped"
            );
        }
    }

    /// Click hook for scene entries.
    pub async fn on_activate(&self, category: &str, id: &str) {
        let descriptor = match self.category(category) {
            Some(descriptor) => descriptor,
            None => {
                warn!(category = %category, "Activation for unknown category");
                return;
            }
        };

        if descriptor.kind != CategoryKind::Scene {
            warn!(category = %category, entity_id = %id, "Activation on a switch-like category");
            return;
        }

        if let Err(e) = self.dispatcher.activate(descriptor, id).await {
            warn!(
                category = %category,
                entity_id = %id,
                error = %e,
                "Activation command dropped"
            );
        }
    }
}
