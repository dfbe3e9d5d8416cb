use serde::Deserialize;

/// Whether a category's entities toggle on/off or activate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Entities carry an on/off state; commands POST `{command_path}/{id}/{on|off}`
    Switch,
    /// Entities carry a last-activated timestamp; commands POST `{command_path}/{id}`
    Scene,
}

/// Descriptor for one pollable, command-routed entity category.
///
/// A single descriptor parameterizes the whole fetch/update flow for a
/// category, so every category shares one poller and one dispatcher
/// implementation instead of per-category copies of the same state machine.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CategoryConfig {
    /// Category name, used as the store key and in log fields
    pub name: String,

    /// GET path returning the category's entity list
    pub fetch_path: String,

    /// POST path prefix for entity commands
    pub command_path: String,

    /// Switch-like or scene-like command routing
    pub kind: CategoryKind,
}

impl CategoryConfig {
    /// Descriptor for a switch-like category.
    pub fn switch(name: &str, fetch_path: &str, command_path: &str) -> Self {
        Self {
            name: name.to_string(),
            fetch_path: fetch_path.to_string(),
            command_path: command_path.to_string(),
            kind: CategoryKind::Switch,
        }
    }

    /// Descriptor for a scene-like category.
    pub fn scene(name: &str, fetch_path: &str, command_path: &str) -> Self {
        Self {
            name: name.to_string(),
            fetch_path: fetch_path.to_string(),
            command_path: command_path.to_string(),
            kind: CategoryKind::Scene,
        }
    }

    /// The stock category set: scenes, switches, lights and states on their
    /// conventional backend routes.
    pub fn default_set() -> Vec<Self> {
        vec![
            Self::scene("scenes", "/api/scenes", "/api/start_scene"),
            Self::switch("switches", "/api/switches", "/api/set_switch"),
            Self::switch("lights", "/api/lights", "/api/set_light"),
            Self::switch("states", "/api/states", "/api/set_state"),
        ]
    }
}
