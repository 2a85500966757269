//! Group resolver extension point.
//!
//! A resolver can fully answer a group operation in place of the
//! underlying directory. This is the backward-compatibility path for
//! user stores that cannot supply stable group IDs themselves: the
//! resolver mints IDs and persists the ID-to-name mapping on their
//! behalf. All operations default to [`Resolution::Declined`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::JanusResult;
use crate::manager::GroupManager;
use crate::models::condition::Condition;
use crate::models::group::{Group, GroupListParams};

/// Outcome of a resolver operation.
///
/// `Resolved` means the resolver fully handled the operation: the
/// underlying directory call is skipped and the carried value stands in
/// for the directory result. `Declined` means the next enabled resolver
/// is tried; if all decline, the directory call proceeds normally.
/// Resolver errors are raised as `Err` and abort the operation; they
/// are never treated as declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<T> {
    Resolved(T),
    Declined,
}

/// A strategy that answers group operations without delegating to the
/// underlying directory.
///
/// [`is_enabled`] is checked immediately before every call; a disabled
/// resolver is skipped entirely. Enabled resolvers are consulted in
/// ascending [`execution_order_id`] order and resolution stops at the
/// first `Resolved`: at most one resolver's result is trusted per
/// operation.
///
/// The mutation operations take raw fields rather than a [`Group`]:
/// they exist precisely for directories that may not support the
/// operation at all, so the resolver is the sole authority for ID
/// minting and must persist the ID-to-name mapping itself.
///
/// [`is_enabled`]: GroupResolver::is_enabled
/// [`execution_order_id`]: GroupResolver::execution_order_id
#[async_trait]
pub trait GroupResolver: Send + Sync {
    fn is_enabled(&self) -> bool;

    /// Invocation priority among registered resolvers; lower runs first.
    fn execution_order_id(&self) -> i32;

    /// Resolve the user-store domain owning the group with the given ID.
    async fn group_domain_by_id(
        &self,
        _group_id: &str,
        _tenant_id: i32,
    ) -> JanusResult<Resolution<String>> {
        Ok(Resolution::Declined)
    }

    async fn groups_of_user(
        &self,
        _user_id: &str,
        _manager: &GroupManager,
    ) -> JanusResult<Resolution<Vec<Group>>> {
        Ok(Resolution::Declined)
    }

    async fn group_id_by_name(
        &self,
        _name: &str,
        _manager: &GroupManager,
    ) -> JanusResult<Resolution<String>> {
        Ok(Resolution::Declined)
    }

    async fn group_name_by_id(
        &self,
        _group_id: &str,
        _manager: &GroupManager,
    ) -> JanusResult<Resolution<String>> {
        Ok(Resolution::Declined)
    }

    async fn group_by_id(
        &self,
        _group_id: &str,
        _requested_claims: &[String],
        _manager: &GroupManager,
    ) -> JanusResult<Resolution<Group>> {
        Ok(Resolution::Declined)
    }

    async fn group_by_name(
        &self,
        _name: &str,
        _requested_claims: &[String],
        _manager: &GroupManager,
    ) -> JanusResult<Resolution<Group>> {
        Ok(Resolution::Declined)
    }

    async fn list_groups(
        &self,
        _condition: Option<&Condition>,
        _params: &GroupListParams,
        _manager: &GroupManager,
    ) -> JanusResult<Resolution<Vec<Group>>> {
        Ok(Resolution::Declined)
    }

    /// Create a group. `group_id` is the caller-supplied ID, if any;
    /// when `None` the resolver mints one.
    async fn add_group(
        &self,
        _name: &str,
        _group_id: Option<&str>,
        _created_at: DateTime<Utc>,
        _updated_at: DateTime<Utc>,
        _location: Option<&str>,
        _tenant_id: i32,
    ) -> JanusResult<Resolution<Group>> {
        Ok(Resolution::Declined)
    }

    async fn delete_group(&self, _name: &str, _tenant_id: i32) -> JanusResult<Resolution<()>> {
        Ok(Resolution::Declined)
    }

    async fn update_group_name(
        &self,
        _old_name: &str,
        _new_name: &str,
        _tenant_id: i32,
    ) -> JanusResult<Resolution<Group>> {
        Ok(Resolution::Declined)
    }
}
