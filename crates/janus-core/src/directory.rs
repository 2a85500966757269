//! Underlying directory boundary.
//!
//! The dispatcher calls these methods only when neither a pre-listener
//! veto nor a resolver hit has skipped the operation. Implementations
//! own persistence and search; errors they raise propagate to the
//! caller unmodified.

use async_trait::async_trait;

use crate::error::JanusResult;
use crate::models::condition::Condition;
use crate::models::group::{Group, GroupListParams, NewGroup};

/// The external user store that performs actual persistence and search
/// for groups.
///
/// Lookups return `None` when no matching group exists; absence is not
/// an error on the read path. `requested_claims` selects which claim
/// attributes the store populates on returned groups; an empty slice
/// means none.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    async fn get_group_by_id(
        &self,
        group_id: &str,
        requested_claims: &[String],
        tenant_id: i32,
    ) -> JanusResult<Option<Group>>;

    async fn get_group_name_by_id(
        &self,
        group_id: &str,
        tenant_id: i32,
    ) -> JanusResult<Option<String>>;

    async fn get_group_by_name(
        &self,
        name: &str,
        requested_claims: &[String],
        tenant_id: i32,
        domain: &str,
    ) -> JanusResult<Option<Group>>;

    async fn get_group_id_by_name(
        &self,
        name: &str,
        tenant_id: i32,
        domain: &str,
    ) -> JanusResult<Option<String>>;

    /// List groups matching `condition` (no condition means all groups
    /// in the domain). A `params.limit` of zero or less is unbounded.
    async fn list_groups(
        &self,
        condition: Option<&Condition>,
        params: &GroupListParams,
        tenant_id: i32,
    ) -> JanusResult<Vec<Group>>;

    async fn get_groups_of_user(
        &self,
        user_id: &str,
        tenant_id: i32,
    ) -> JanusResult<Vec<Group>>;

    async fn add_group(&self, group: NewGroup) -> JanusResult<Group>;

    /// Returns whether a group was actually removed. Deleting a group
    /// that does not exist is not an error.
    async fn delete_group(&self, name: &str, tenant_id: i32, domain: &str) -> JanusResult<bool>;

    async fn update_group_name(
        &self,
        old_name: &str,
        new_name: &str,
        tenant_id: i32,
        domain: &str,
    ) -> JanusResult<Group>;
}
