use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};


/// On/off position of a switch-like entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    /// Returns the opposite position.
    pub fn toggled(self) -> Self {
        match self {
            SwitchState::On => SwitchState::Off,
            SwitchState::Off => SwitchState::On,
        }
    }

    /// Path segment used by backend command routes.
    pub fn as_str(self) -> &'static str {
        match self {
            SwitchState::On => "on",
            SwitchState::Off => "off",
        }
    }
}

/// Mutable half of an entity, tagged by category behavior.
///
/// Switch-like entities carry an on/off state; scene-like entities carry the
/// timestamp of their most recent activation. Keeping the two as explicit
/// variants means activation logic cannot be applied to a switch and toggle
/// logic cannot be applied to a scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityKind {
    Switch {
        state: SwitchState,
    },
    #[serde(rename_all = "camelCase")]
    Scene {
        last_activated: DateTime<Utc>,
    },
}

/// One controllable item within a category (a scene, switch, light or state).
///
/// `id` and `friendly_name` are backend-owned and immutable from the client's
/// perspective; only `kind` changes over an entity's lifetime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Stable identifier, unique within its category
    pub id: String,

    /// Display label
    pub friendly_name: String,

    /// Switch state or last activation, depending on the category
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl Entity {
    /// The on/off state, if this is a switch-like entity.
    pub fn switch_state(&self) -> Option<SwitchState> {
        match self.kind {
            EntityKind::Switch { state } => Some(state),
            EntityKind::Scene { .. } => None,
        }
    }

    /// The most recent activation timestamp, if this is a scene-like entity.
    pub fn last_activated(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            EntityKind::Scene { last_activated } => Some(last_activated),
            EntityKind::Switch { .. } => None,
        }
    }
}
