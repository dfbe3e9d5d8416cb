//! Scene display ordering and active-scene derivation.
//!
//! Pure functions over entity lists; no state beyond the configured priority
//! sequence, no I/O.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::entity::{Entity, EntityKind};

/// Fixed display priority for scene ids.
///
/// Scenes whose id appears in the priority sequence are shown first, in that
/// order; everything else follows in the order the backend reported it.
#[derive(Clone, Debug, Deserialize)]
pub struct SceneOrder {
    priority: Vec<String>,
}

impl Default for SceneOrder {
    fn default() -> Self {
        Self {
            priority: ["off", "morning", "afternoon", "evening", "night"]
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

impl SceneOrder {
    pub fn new(priority: Vec<String>) -> Self {
        Self { priority }
    }

    /// Reorders `scenes` for display.
    ///
    /// Priority ids missing from the input are skipped, never padded with
    /// placeholders. Same entities in, same entities out; only the order
    /// changes.
    pub fn order(&self, scenes: &[Entity]) -> Vec<Entity> {
        let mut rest: Vec<Entity> = scenes.to_vec();
        let mut ordered = Vec::with_capacity(rest.len());

        for id in &self.priority {
            if let Some(index) = rest.iter().position(|scene| &scene.id == id) {
                ordered.push(rest.remove(index));
            }
        }

        ordered.extend(rest);
        ordered
    }
}

/// The most recently activated scene.
///
/// Ties go to the first encountered; entities without an activation
/// timestamp are ignored. Returns `None` when the input holds no scene-like
/// entity, so the caller must guard against empty categories.
pub fn currently_active(scenes: &[Entity]) -> Option<&Entity> {
    let mut best: Option<(&Entity, DateTime<Utc>)> = None;

    for scene in scenes {
        if let EntityKind::Scene { last_activated } = scene.kind {
            match best {
                Some((_, current)) if last_activated <= current => {}
                _ => best = Some((scene, last_activated)),
            }
        }
    }

    best.map(|(scene, _)| scene)
}
