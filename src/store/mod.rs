//! In-memory entity snapshots, one per category.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::entity::{Entity, EntityKind};


/// Locally held, possibly stale copy of one category's entity list.
#[derive(Clone, Debug, PartialEq)]
pub enum CategorySnapshot {
    /// No fetch has completed yet
    Loading,
    /// Entity list from the most recent successful fetch
    Loaded(Vec<Entity>),
}

/// Change notification broadcast after each effective store mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreUpdate {
    pub category: String,
    pub change: StoreChange,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StoreChange {
    /// Full snapshot replace from a poll
    Replaced,
    /// Single-entity patch from a command response
    Patched { entity_id: String },
}

/// EntityStore is the single shared mutable resource of the sync core.
///
/// Snapshots are owned exclusively by the store: the poller and the command
/// dispatcher go through `replace_all` / `update_one` and never touch entity
/// lists directly. Subscribers are notified after each mutation that changed
/// anything.
pub struct EntityStore {
    /// Lock-free concurrent map, one snapshot per configured category
    categories: DashMap<String, CategorySnapshot>,

    /// Broadcast channel for snapshot change notifications
    update_tx: broadcast::Sender<StoreUpdate>,
}

impl EntityStore {
    /// Creates a store with every configured category in `Loading`.
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let map = DashMap::new();
        for name in categories {
            map.insert(name.into(), CategorySnapshot::Loading);
        }

        let (update_tx, _) = broadcast::channel(64);

        Self {
            categories: map,
            update_tx,
        }
    }

    /// Current snapshot for a category, `None` if the category is not configured.
    pub fn snapshot(&self, category: &str) -> Option<CategorySnapshot> {
        self.categories.get(category).map(|s| s.clone())
    }

    /// Names of all configured categories.
    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|e| e.key().clone()).collect()
    }

    /// Replaces a category's snapshot wholesale with a freshly fetched list.
    ///
    /// The previous list is discarded regardless of prior state; entities the
    /// backend no longer reports disappear here.
    pub fn replace_all(&self, category: &str, entities: Vec<Entity>) {
        match self.categories.get_mut(category) {
            Some(mut snapshot) => {
                *snapshot = CategorySnapshot::Loaded(entities);
            }
            None => {
                warn!(category = %category, "Ignoring fetch result for unconfigured category");
                return;
            }
        }

        let _ = self.update_tx.send(StoreUpdate {
            category: category.to_string(),
            change: StoreChange::Replaced,
        });
    }

    /// Patches one entity's mutable half in place.
    ///
    /// No-op while the snapshot is still `Loading` or when no entity carries
    /// `id`. List order, the entity's display name and every other entity are
    /// left untouched.
    pub fn update_one(&self, category: &str, id: &str, kind: EntityKind) {
        let patched = match self.categories.get_mut(category) {
            Some(mut snapshot) => match &mut *snapshot {
                CategorySnapshot::Loading => {
                    debug!(
                        category = %category,
                        entity_id = %id,
                        "Dropping update for category still loading"
                    );
                    false
                }
                CategorySnapshot::Loaded(entities) => {
                    match entities.iter_mut().find(|e| e.id == id) {
                        Some(entity) => {
                            if std::mem::discriminant(&entity.kind)
                                != std::mem::discriminant(&kind)
                            {
                                warn!(
                                    category = %category,
                                    entity_id = %id,
                                    "Entity switched between switch-like and scene-like"
                                );
                            }
                            entity.kind = kind;
                            true
                        }
                        None => {
                            debug!(
                                category = %category,
                                entity_id = %id,
                                "Dropping update for unknown entity"
                            );
                            false
                        }
                    }
                }
            },
            None => {
                warn!(category = %category, "Ignoring update for unconfigured category");
                false
            }
        };

        if patched {
            let _ = self.update_tx.send(StoreUpdate {
                category: category.to_string(),
                change: StoreChange::Patched {
                    entity_id: id.to_string(),
                },
            });
        }
    }

    /// Subscribe to snapshot change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.update_tx.subscribe()
    }
}
