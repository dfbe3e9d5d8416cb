use super::*;
use crate::backend::{Backend, BackendError};
use crate::entity::EntityKind;
use async_trait::async_trait;
use chrono::TimeZone;
use chrono::Utc;

fn switch(id: &str, name: &str, state: SwitchState) -> Entity {
    Entity {
        id: id.to_string(),
        friendly_name: name.to_string(),
        kind: EntityKind::Switch { state },
    }
}

fn scene(id: &str, activated_secs: i64) -> Entity {
    Entity {
        id: id.to_string(),
        friendly_name: id.to_string(),
        kind: EntityKind::Scene {
            last_activated: Utc.timestamp_opt(activated_secs, 0).unwrap(),
        },
    }
}

/// Backend echoing a canned entity for every command.
struct EchoBackend {
    entity: Entity,
}

#[async_trait]
impl Backend for EchoBackend {
    async fn fetch(&self, _category: &CategoryConfig) -> Result<Vec<Entity>, BackendError> {
        panic!("dashboard must not fetch");
    }

    async fn toggle(
        &self,
        _category: &CategoryConfig,
        _id: &str,
        _target: SwitchState,
    ) -> Result<Entity, BackendError> {
        Ok(self.entity.clone())
    }

    async fn activate(
        &self,
        _category: &CategoryConfig,
        _id: &str,
    ) -> Result<Entity, BackendError> {
        Ok(self.entity.clone())
    }
}

struct FailingBackend;

#[async_trait]
impl Backend for FailingBackend {
    async fn fetch(&self, _category: &CategoryConfig) -> Result<Vec<Entity>, BackendError> {
        panic!("dashboard must not fetch");
    }

    async fn toggle(
        &self,
        _category: &CategoryConfig,
        _id: &str,
        _target: SwitchState,
    ) -> Result<Entity, BackendError> {
        Err(BackendError::Status(reqwest::StatusCode::BAD_GATEWAY))
    }

    async fn activate(
        &self,
        _category: &CategoryConfig,
        _id: &str,
    ) -> Result<Entity, BackendError> {
        Err(BackendError::Status(reqwest::StatusCode::BAD_GATEWAY))
    }
}

fn make_dashboard(backend: Arc<dyn Backend>) -> (Dashboard, Arc<EntityStore>) {
    let categories = CategoryConfig::default_set();
    let store = Arc::new(EntityStore::new(
        categories.iter().map(|c| c.name.clone()),
    ));
    let dispatcher = Arc::new(CommandDispatcher::new(backend, Arc::clone(&store)));
    let dashboard = Dashboard::new(
        Arc::clone(&store),
        dispatcher,
        SceneOrder::default(),
        categories,
    );
    (dashboard, store)
}

#[tokio::test]
async fn test_snapshot_passthrough() {
    let (dashboard, store) = make_dashboard(Arc::new(FailingBackend));

    assert_eq!(
        dashboard.snapshot("switches"),
        Some(CategorySnapshot::Loading)
    );

    store.replace_all("switches", vec![switch("sw1", "Kitchen", SwitchState::On)]);
    assert_eq!(
        dashboard.snapshot("switches"),
        Some(CategorySnapshot::Loaded(vec![switch(
            "sw1",
            "Kitchen",
            SwitchState::On
        )]))
    );
}

#[tokio::test]
async fn test_ordered_scenes_applies_priority() {
    let (dashboard, store) = make_dashboard(Arc::new(FailingBackend));

    store.replace_all(
        "scenes",
        vec![scene("night", 1), scene("off", 2), scene("custom", 3)],
    );

    let snapshot = dashboard.ordered_scenes("scenes").unwrap();
    let ids: Vec<String> = match snapshot {
        CategorySnapshot::Loaded(entities) => entities.into_iter().map(|e| e.id).collect(),
        CategorySnapshot::Loading => panic!("snapshot should be loaded"),
    };
    assert_eq!(ids, vec!["off", "night", "custom"]);
}

#[tokio::test]
async fn test_ordered_scenes_while_loading() {
    let (dashboard, _store) = make_dashboard(Arc::new(FailingBackend));
    assert_eq!(
        dashboard.ordered_scenes("scenes"),
        Some(CategorySnapshot::Loading)
    );
}

#[tokio::test]
async fn test_active_scene() {
    let (dashboard, store) = make_dashboard(Arc::new(FailingBackend));

    assert_eq!(dashboard.active_scene("scenes"), None);

    store.replace_all("scenes", vec![scene("evening", 10), scene("night", 30)]);
    assert_eq!(dashboard.active_scene("scenes").unwrap().id, "night");
}

#[tokio::test]
async fn test_on_toggle_merges_echo() {
    let (dashboard, store) = make_dashboard(Arc::new(EchoBackend {
        entity: switch("sw1", "Kitchen", SwitchState::On),
    }));
    store.replace_all("switches", vec![switch("sw1", "Kitchen", SwitchState::Off)]);

    dashboard.on_toggle("switches", "sw1", SwitchState::On).await;

    assert_eq!(
        store.snapshot("switches"),
        Some(CategorySnapshot::Loaded(vec![switch(
            "sw1",
            "Kitchen",
            SwitchState::On
        )]))
    );
}

#[tokio::test]
async fn test_on_toggle_swallows_command_failure() {
    let (dashboard, store) = make_dashboard(Arc::new(FailingBackend));
    store.replace_all("switches", vec![switch("sw1", "Kitchen", SwitchState::Off)]);
    let before = store.snapshot("switches");

    dashboard.on_toggle("switches", "sw1", SwitchState::On).await;

    assert_eq!(store.snapshot("switches"), before);
}

#[tokio::test]
async fn test_on_toggle_rejects_scene_category() {
    // Would otherwise POST a toggle route for a scene; must be a no-op
    let (dashboard, store) = make_dashboard(Arc::new(EchoBackend {
        entity: switch("evening", "Evening", SwitchState::On),
    }));
    store.replace_all("scenes", vec![scene("evening", 10)]);
    let before = store.snapshot("scenes");

    dashboard.on_toggle("scenes", "evening", SwitchState::On).await;

    assert_eq!(store.snapshot("scenes"), before);
}

#[tokio::test]
async fn test_on_activate_rejects_switch_category() {
    let (dashboard, store) = make_dashboard(Arc::new(EchoBackend {
        entity: switch("sw1", "Kitchen", SwitchState::On),
    }));
    store.replace_all("switches", vec![switch("sw1", "Kitchen", SwitchState::Off)]);
    let before = store.snapshot("switches");

    dashboard.on_activate("switches", "sw1").await;

    assert_eq!(store.snapshot("switches"), before);
}

#[tokio::test]
async fn test_on_activate_unknown_category_is_noop() {
    let (dashboard, _store) = make_dashboard(Arc::new(FailingBackend));
    dashboard.on_activate("thermostats", "t1").await;
}

#[tokio::test]
async fn test_subscribe_sees_store_updates() {
    let (dashboard, store) = make_dashboard(Arc::new(FailingBackend));
    let mut rx = dashboard.subscribe();

    store.replace_all("lights", vec![]);

    let update = rx.try_recv().unwrap();
    assert_eq!(update.category, "lights");
}
