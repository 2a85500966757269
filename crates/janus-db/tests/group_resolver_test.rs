//! Integration tests for the group-ID mapping resolver, including the
//! full dispatch path where the resolver stands in for a directory
//! without native group IDs.

use std::sync::Arc;

use chrono::Utc;
use janus_core::resolver::{GroupResolver, Resolution};
use janus_core::{ExtensionRegistry, GroupManager};
use janus_db::{MappedGroupResolver, SurrealGroupDirectory};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

/// Helper: in-memory DB with migrations, one manager wired with the
/// mapping resolver in front of the SurrealDB directory.
async fn setup() -> (GroupManager, Arc<MappedGroupResolver<Db>>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    janus_db::run_migrations(&db).await.unwrap();

    let resolver = Arc::new(MappedGroupResolver::new(db.clone(), "PRIMARY"));
    let manager = GroupManager::new(
        Arc::new(SurrealGroupDirectory::new(db)),
        ExtensionRegistry::new(Vec::new(), vec![resolver.clone()]),
        1,
        "PRIMARY",
    );
    (manager, resolver)
}

fn resolved<T>(resolution: Resolution<T>) -> T {
    match resolution {
        Resolution::Resolved(value) => value,
        Resolution::Declined => panic!("resolver declined"),
    }
}

#[tokio::test]
async fn add_group_resolves_through_mapping_not_directory() {
    let (manager, _resolver) = setup().await;

    let group = manager
        .add_group("finance", &[], Some("/groups/finance"))
        .await
        .unwrap()
        .unwrap();

    // The resolver minted a real ID and persisted the mapping.
    assert!(Uuid::parse_str(&group.id).is_ok());
    assert_eq!(group.location.as_deref(), Some("/groups/finance"));

    // The directory's native store never saw the group.
    assert!(
        manager
            .directory()
            .get_group_by_name("finance", &[], 1, "PRIMARY")
            .await
            .unwrap()
            .is_none()
    );

    // The minted ID resolves through the same resolver afterwards.
    let fetched = manager.get_group_by_id(&group.id, &[]).await.unwrap().unwrap();
    assert_eq!(fetched.name, "finance");
    assert_eq!(fetched.domain, "PRIMARY");

    let name = manager.get_group_name_by_id(&group.id).await.unwrap();
    assert_eq!(name.as_deref(), Some("finance"));

    let id = manager.get_group_id_by_name("finance").await.unwrap();
    assert_eq!(id.as_deref(), Some(group.id.as_str()));

    let domain = manager.get_group_domain_by_id(&group.id).await.unwrap();
    assert_eq!(domain.as_deref(), Some("PRIMARY"));
}

#[tokio::test]
async fn caller_supplied_id_is_kept() {
    let (_manager, resolver) = setup().await;

    let now = Utc::now();
    let group = resolved(
        resolver
            .add_group("ops", Some("custom-id"), now, now, None, 1)
            .await
            .unwrap(),
    );
    assert_eq!(group.id, "custom-id");
    assert_eq!(group.name, "ops");
}

#[tokio::test]
async fn unknown_groups_are_declined_not_errors() {
    let (manager, resolver) = setup().await;

    assert!(matches!(
        resolver.group_by_id("missing", &[], &manager).await.unwrap(),
        Resolution::Declined
    ));
    assert!(matches!(
        resolver.delete_group("missing", 1).await.unwrap(),
        Resolution::Declined
    ));
    assert!(matches!(
        resolver.update_group_name("missing", "other", 1).await.unwrap(),
        Resolution::Declined
    ));
}

#[tokio::test]
async fn rename_updates_the_mapping() {
    let (manager, resolver) = setup().await;

    let group = manager.add_group("finance", &[], None).await.unwrap().unwrap();

    let renamed = resolved(
        resolver
            .update_group_name("finance", "treasury", 1)
            .await
            .unwrap(),
    );
    assert_eq!(renamed.id, group.id);
    assert_eq!(renamed.name, "treasury");

    assert!(matches!(
        resolver.group_id_by_name("finance", &manager).await.unwrap(),
        Resolution::Declined
    ));
    let id = resolved(resolver.group_id_by_name("treasury", &manager).await.unwrap());
    assert_eq!(id, group.id);
}

#[tokio::test]
async fn delete_removes_the_mapping() {
    let (manager, resolver) = setup().await;

    let group = manager.add_group("finance", &[], None).await.unwrap().unwrap();

    resolved(resolver.delete_group("finance", 1).await.unwrap());
    assert!(matches!(
        resolver.group_by_id(&group.id, &[], &manager).await.unwrap(),
        Resolution::Declined
    ));

    // A second delete declines so the directory gets its turn.
    assert!(matches!(
        resolver.delete_group("finance", 1).await.unwrap(),
        Resolution::Declined
    ));
}

#[tokio::test]
async fn rename_through_manager_reaches_the_mapping_first() {
    let (manager, resolver) = setup().await;

    let group = manager.add_group("finance", &[], None).await.unwrap().unwrap();

    let renamed = manager
        .update_group_name("finance", "treasury")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.id, group.id);
    assert_eq!(renamed.name, "treasury");

    let name = resolved(resolver.group_name_by_id(&group.id, &manager).await.unwrap());
    assert_eq!(name, "treasury");
}

#[tokio::test]
async fn disabled_resolver_leaves_operations_to_the_directory() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    janus_db::run_migrations(&db).await.unwrap();

    let resolver =
        Arc::new(MappedGroupResolver::new(db.clone(), "PRIMARY").with_enabled(false));
    let manager = GroupManager::new(
        Arc::new(SurrealGroupDirectory::new(db)),
        ExtensionRegistry::new(Vec::new(), vec![resolver]),
        1,
        "PRIMARY",
    );

    let group = manager.add_group("hr", &[], None).await.unwrap().unwrap();

    // The directory's native store handled the create.
    let stored = manager
        .directory()
        .get_group_by_name("hr", &[], 1, "PRIMARY")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, group.id);
}
