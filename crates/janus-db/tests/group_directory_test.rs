//! Integration tests for the SurrealDB group directory using an
//! in-memory engine.

use std::collections::HashMap;

use janus_core::directory::GroupDirectory;
use janus_core::{
    Condition, ExpressionOperator, GroupListParams, JanusError, NewGroup, SortOrder,
};
use janus_db::SurrealGroupDirectory;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

/// Helper: spin up an in-memory DB and run migrations.
async fn setup() -> SurrealGroupDirectory<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    janus_db::run_migrations(&db).await.unwrap();
    SurrealGroupDirectory::new(db)
}

fn new_group(name: &str) -> NewGroup {
    NewGroup {
        name: name.into(),
        domain: "PRIMARY".into(),
        tenant_id: 1,
        members: Vec::new(),
        location: None,
        attributes: HashMap::new(),
    }
}

fn list_params(limit: i32, offset: u32, sort_by: Option<&str>, sort_order: SortOrder) -> GroupListParams {
    GroupListParams {
        limit,
        offset,
        sort_by: sort_by.map(str::to_owned),
        sort_order,
        domain: "PRIMARY".into(),
    }
}

#[tokio::test]
async fn create_and_get_group_by_id() {
    let directory = setup().await;

    let created = directory.add_group(new_group("engineering")).await.unwrap();
    assert_eq!(created.name, "engineering");
    assert_eq!(created.domain, "PRIMARY");
    assert_eq!(created.tenant_id, 1);

    let fetched = directory
        .get_group_by_id(&created.id, &[], 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, "engineering");
}

#[tokio::test]
async fn name_and_id_lookups_agree() {
    let directory = setup().await;
    let created = directory.add_group(new_group("finance")).await.unwrap();

    let by_name = directory
        .get_group_by_name("finance", &[], 1, "PRIMARY")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, created.id);

    let id = directory
        .get_group_id_by_name("finance", 1, "PRIMARY")
        .await
        .unwrap();
    assert_eq!(id.as_deref(), Some(created.id.as_str()));

    let name = directory.get_group_name_by_id(&created.id, 1).await.unwrap();
    assert_eq!(name.as_deref(), Some("finance"));
}

#[tokio::test]
async fn missing_lookups_return_none() {
    let directory = setup().await;

    assert!(directory.get_group_by_id("missing", &[], 1).await.unwrap().is_none());
    assert!(
        directory
            .get_group_by_name("missing", &[], 1, "PRIMARY")
            .await
            .unwrap()
            .is_none()
    );
    assert!(directory.get_group_name_by_id("missing", 1).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_name_in_same_domain_is_rejected() {
    let directory = setup().await;
    directory.add_group(new_group("finance")).await.unwrap();

    let err = directory.add_group(new_group("finance")).await.unwrap_err();
    assert!(matches!(err, JanusError::AlreadyExists { .. }));
}

#[tokio::test]
async fn rename_group() {
    let directory = setup().await;
    let created = directory.add_group(new_group("engineering")).await.unwrap();

    let renamed = directory
        .update_group_name("engineering", "platform", 1, "PRIMARY")
        .await
        .unwrap();
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.name, "platform");

    assert!(
        directory
            .get_group_by_name("engineering", &[], 1, "PRIMARY")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        directory
            .get_group_by_name("platform", &[], 1, "PRIMARY")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn rename_missing_group_is_an_error() {
    let directory = setup().await;

    let err = directory
        .update_group_name("missing", "anything", 1, "PRIMARY")
        .await
        .unwrap_err();
    assert!(matches!(err, JanusError::NotFound { .. }));
}

#[tokio::test]
async fn rename_onto_taken_name_is_rejected() {
    let directory = setup().await;
    directory.add_group(new_group("finance")).await.unwrap();
    directory.add_group(new_group("treasury")).await.unwrap();

    let err = directory
        .update_group_name("finance", "treasury", 1, "PRIMARY")
        .await
        .unwrap_err();
    assert!(matches!(err, JanusError::AlreadyExists { .. }));
}

#[tokio::test]
async fn delete_group_is_idempotent() {
    let directory = setup().await;
    directory.add_group(new_group("finance")).await.unwrap();

    assert!(directory.delete_group("finance", 1, "PRIMARY").await.unwrap());
    assert!(
        directory
            .get_group_by_name("finance", &[], 1, "PRIMARY")
            .await
            .unwrap()
            .is_none()
    );
    assert!(!directory.delete_group("finance", 1, "PRIMARY").await.unwrap());
}

#[tokio::test]
async fn membership_edges_answer_groups_of_user() {
    let directory = setup().await;

    let mut group = new_group("oncall");
    group.members = vec!["user-a".into(), "user-b".into()];
    let created = directory.add_group(group).await.unwrap();

    let groups = directory.get_groups_of_user("user-a", 1).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, created.id);

    assert!(directory.get_groups_of_user("user-c", 1).await.unwrap().is_empty());

    // Deleting the group removes its membership edges.
    directory.delete_group("oncall", 1, "PRIMARY").await.unwrap();
    assert!(directory.get_groups_of_user("user-a", 1).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_groups_applies_conditions() {
    let directory = setup().await;
    directory.add_group(new_group("engineering")).await.unwrap();
    directory.add_group(new_group("finance")).await.unwrap();
    directory.add_group(new_group("marketing")).await.unwrap();

    let params = list_params(0, 0, Some("name"), SortOrder::Asc);

    let eq = Condition::expression("name", ExpressionOperator::Eq, "finance");
    let groups = directory.list_groups(Some(&eq), &params, 1).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "finance");

    let sw = Condition::expression("name", ExpressionOperator::Sw, "ma");
    let groups = directory.list_groups(Some(&sw), &params, 1).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "marketing");

    let co = Condition::expression("name", ExpressionOperator::Co, "eer");
    let groups = directory.list_groups(Some(&co), &params, 1).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "engineering");

    let either = Condition::expression("name", ExpressionOperator::Eq, "finance")
        .or(Condition::expression("name", ExpressionOperator::Eq, "marketing"));
    let groups = directory.list_groups(Some(&either), &params, 1).await.unwrap();
    assert_eq!(groups.len(), 2);
}

#[tokio::test]
async fn list_groups_sorts_and_pages() {
    let directory = setup().await;
    directory.add_group(new_group("engineering")).await.unwrap();
    directory.add_group(new_group("finance")).await.unwrap();
    directory.add_group(new_group("marketing")).await.unwrap();

    let first_page = directory
        .list_groups(None, &list_params(2, 0, Some("name"), SortOrder::Asc), 1)
        .await
        .unwrap();
    let names: Vec<&str> = first_page.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["engineering", "finance"]);

    let second_page = directory
        .list_groups(None, &list_params(2, 2, Some("name"), SortOrder::Asc), 1)
        .await
        .unwrap();
    let names: Vec<&str> = second_page.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["marketing"]);
}

#[tokio::test]
async fn zero_limit_means_unbounded() {
    let directory = setup().await;
    directory.add_group(new_group("engineering")).await.unwrap();
    directory.add_group(new_group("finance")).await.unwrap();
    directory.add_group(new_group("marketing")).await.unwrap();

    let groups = directory
        .list_groups(None, &list_params(0, 0, Some("name"), SortOrder::Desc), 1)
        .await
        .unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["marketing", "finance", "engineering"]);
}

#[tokio::test]
async fn unknown_filter_field_is_rejected() {
    let directory = setup().await;
    directory.add_group(new_group("finance")).await.unwrap();

    let condition = Condition::expression("password", ExpressionOperator::Eq, "x");
    let err = directory
        .list_groups(
            Some(&condition),
            &list_params(0, 0, None, SortOrder::Asc),
            1,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, JanusError::Validation { .. }));
}

#[tokio::test]
async fn requested_claims_select_attributes() {
    let directory = setup().await;

    let mut group = new_group("engineering");
    group.attributes = HashMap::from([
        ("mail".to_owned(), "eng@example.org".to_owned()),
        ("description".to_owned(), "builds things".to_owned()),
    ]);
    let created = directory.add_group(group).await.unwrap();

    let requested = vec!["mail".to_owned()];
    let fetched = directory
        .get_group_by_id(&created.id, &requested, 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        fetched.attributes.get("mail").map(String::as_str),
        Some("eng@example.org")
    );
    assert!(!fetched.attributes.contains_key("description"));

    let bare = directory
        .get_group_by_id(&created.id, &[], 1)
        .await
        .unwrap()
        .unwrap();
    assert!(bare.attributes.is_empty());
}

#[tokio::test]
async fn tenants_are_isolated() {
    let directory = setup().await;
    let created = directory.add_group(new_group("finance")).await.unwrap();

    assert!(directory.get_group_by_id(&created.id, &[], 2).await.unwrap().is_none());
    assert!(
        directory
            .get_group_by_name("finance", &[], 2, "PRIMARY")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        directory
            .list_groups(None, &list_params(0, 0, None, SortOrder::Asc), 2)
            .await
            .unwrap()
            .is_empty()
    );
}
