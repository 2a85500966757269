//! Listener chain extension point.
//!
//! Listeners observe every group operation before and after it runs
//! against the underlying directory and may veto it. All hooks default
//! to [`HookOutcome::Proceed`] so implementations override only the
//! operations they care about.

use async_trait::async_trait;

use crate::error::JanusResult;
use crate::manager::GroupManager;
use crate::models::condition::Condition;
use crate::models::group::{Group, GroupListParams};

/// Continue-or-stop signal returned by every listener hook.
///
/// In the pre-phase the first `Veto` short-circuits the chain: later
/// pre-listeners do not run, the resolver is not consulted and the
/// directory call is skipped; post-listeners still run over the empty
/// result. In the post-phase a `Veto` only stops later post-listeners,
/// since the already-committed directory effect stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Proceed,
    Veto,
}

/// An observer around the group operations of a [`GroupManager`].
///
/// Hooks run strictly in ascending [`execution_order_id`] order, ties
/// broken by registration order. Each hook receives the calling manager
/// so it can invoke other directory operations if needed. Post-hooks
/// receive the operation result by mutable reference and may enrich it
/// in place; mutation is sequential, never concurrent.
///
/// Any hook error aborts the whole operation immediately.
///
/// [`execution_order_id`]: GroupOperationListener::execution_order_id
#[async_trait]
pub trait GroupOperationListener: Send + Sync {
    /// Invocation priority among registered listeners; lower runs first.
    fn execution_order_id(&self) -> i32;

    async fn pre_get_group_by_id(
        &self,
        _group_id: &str,
        _requested_claims: &[String],
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn post_get_group_by_id(
        &self,
        _group_id: &str,
        _requested_claims: &[String],
        _group: &mut Option<Group>,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn pre_get_group_name_by_id(
        &self,
        _group_id: &str,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn post_get_group_name_by_id(
        &self,
        _group_id: &str,
        _name: &mut Option<String>,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn pre_get_group_by_name(
        &self,
        _name: &str,
        _requested_claims: &[String],
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn post_get_group_by_name(
        &self,
        _name: &str,
        _requested_claims: &[String],
        _group: &mut Option<Group>,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn pre_get_group_id_by_name(
        &self,
        _name: &str,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn post_get_group_id_by_name(
        &self,
        _name: &str,
        _group_id: &mut Option<String>,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn pre_list_groups(
        &self,
        _condition: Option<&Condition>,
        _params: &GroupListParams,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn post_list_groups(
        &self,
        _condition: Option<&Condition>,
        _params: &GroupListParams,
        _groups: &mut Vec<Group>,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn pre_get_groups_of_user(
        &self,
        _user_id: &str,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn post_get_groups_of_user(
        &self,
        _user_id: &str,
        _groups: &mut Vec<Group>,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn pre_add_group(
        &self,
        _name: &str,
        _members: &[String],
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn post_add_group(
        &self,
        _name: &str,
        _members: &[String],
        _group: &mut Option<Group>,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn pre_delete_group(
        &self,
        _name: &str,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn post_delete_group(
        &self,
        _name: &str,
        _deleted: bool,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn pre_update_group_name(
        &self,
        _old_name: &str,
        _new_name: &str,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }

    async fn post_update_group_name(
        &self,
        _old_name: &str,
        _new_name: &str,
        _group: &mut Option<Group>,
        _manager: &GroupManager,
    ) -> JanusResult<HookOutcome> {
        Ok(HookOutcome::Proceed)
    }
}
