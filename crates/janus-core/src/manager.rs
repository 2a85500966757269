//! Group operation dispatcher.
//!
//! Every public operation runs the same fixed sequence: pre-listeners
//! in execution order, then the resolver chain, then the underlying
//! directory if neither skipped the call, then post-listeners over
//! whichever result stands. Exactly one of {pre-listener veto, resolver
//! hit, directory call} is the source of truth per invocation.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::directory::GroupDirectory;
use crate::error::JanusResult;
use crate::listener::HookOutcome;
use crate::models::condition::Condition;
use crate::models::group::{Group, GroupListParams, NewGroup};
use crate::registry::ExtensionRegistry;
use crate::resolver::Resolution;

/// Dispatches group operations through the listener chain and resolver
/// chain before and after the underlying directory.
///
/// One manager serves one (tenant, default domain) pair. The registry
/// is read-only after construction and shared safely across concurrent
/// operations; each operation owns its result for the duration of the
/// call, so listeners never see cross-request mutation.
pub struct GroupManager {
    directory: Arc<dyn GroupDirectory>,
    registry: ExtensionRegistry,
    tenant_id: i32,
    domain: String,
}

impl GroupManager {
    pub fn new(
        directory: Arc<dyn GroupDirectory>,
        registry: ExtensionRegistry,
        tenant_id: i32,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            registry,
            tenant_id,
            domain: domain.into(),
        }
    }

    /// The underlying directory, for listeners and resolvers that need
    /// to reach raw store operations.
    pub fn directory(&self) -> &dyn GroupDirectory {
        self.directory.as_ref()
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    pub fn tenant_id(&self) -> i32 {
        self.tenant_id
    }

    /// Default user-store domain for name-keyed operations.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    // -------------------------------------------------------------------
    // Read path
    // -------------------------------------------------------------------

    pub async fn get_group_by_id(
        &self,
        group_id: &str,
        requested_claims: &[String],
    ) -> JanusResult<Option<Group>> {
        let mut proceed = true;
        for listener in self.registry.listeners() {
            match listener
                .pre_get_group_by_id(group_id, requested_claims, self)
                .await?
            {
                HookOutcome::Proceed => {}
                HookOutcome::Veto => {
                    debug!(
                        group_id,
                        order = listener.execution_order_id(),
                        "get_group_by_id vetoed by pre-listener"
                    );
                    proceed = false;
                    break;
                }
            }
        }

        let mut group: Option<Group> = None;
        if proceed {
            group = match self.resolve_group_by_id(group_id, requested_claims).await? {
                Resolution::Resolved(resolved) => Some(resolved),
                Resolution::Declined => {
                    self.directory
                        .get_group_by_id(group_id, requested_claims, self.tenant_id)
                        .await?
                }
            };
        }

        for listener in self.registry.listeners() {
            if let HookOutcome::Veto = listener
                .post_get_group_by_id(group_id, requested_claims, &mut group, self)
                .await?
            {
                break;
            }
        }

        Ok(group)
    }

    pub async fn get_group_name_by_id(&self, group_id: &str) -> JanusResult<Option<String>> {
        let mut proceed = true;
        for listener in self.registry.listeners() {
            match listener.pre_get_group_name_by_id(group_id, self).await? {
                HookOutcome::Proceed => {}
                HookOutcome::Veto => {
                    proceed = false;
                    break;
                }
            }
        }

        let mut name: Option<String> = None;
        if proceed {
            name = match self.resolve_group_name_by_id(group_id).await? {
                Resolution::Resolved(resolved) => Some(resolved),
                Resolution::Declined => {
                    self.directory
                        .get_group_name_by_id(group_id, self.tenant_id)
                        .await?
                }
            };
        }

        for listener in self.registry.listeners() {
            if let HookOutcome::Veto = listener
                .post_get_group_name_by_id(group_id, &mut name, self)
                .await?
            {
                break;
            }
        }

        Ok(name)
    }

    pub async fn get_group_by_name(
        &self,
        name: &str,
        requested_claims: &[String],
    ) -> JanusResult<Option<Group>> {
        let mut proceed = true;
        for listener in self.registry.listeners() {
            match listener
                .pre_get_group_by_name(name, requested_claims, self)
                .await?
            {
                HookOutcome::Proceed => {}
                HookOutcome::Veto => {
                    proceed = false;
                    break;
                }
            }
        }

        let mut group: Option<Group> = None;
        if proceed {
            group = match self.resolve_group_by_name(name, requested_claims).await? {
                Resolution::Resolved(resolved) => Some(resolved),
                Resolution::Declined => {
                    self.directory
                        .get_group_by_name(name, requested_claims, self.tenant_id, &self.domain)
                        .await?
                }
            };
        }

        for listener in self.registry.listeners() {
            if let HookOutcome::Veto = listener
                .post_get_group_by_name(name, requested_claims, &mut group, self)
                .await?
            {
                break;
            }
        }

        Ok(group)
    }

    pub async fn get_group_id_by_name(&self, name: &str) -> JanusResult<Option<String>> {
        let mut proceed = true;
        for listener in self.registry.listeners() {
            match listener.pre_get_group_id_by_name(name, self).await? {
                HookOutcome::Proceed => {}
                HookOutcome::Veto => {
                    proceed = false;
                    break;
                }
            }
        }

        let mut group_id: Option<String> = None;
        if proceed {
            group_id = match self.resolve_group_id_by_name(name).await? {
                Resolution::Resolved(resolved) => Some(resolved),
                Resolution::Declined => {
                    self.directory
                        .get_group_id_by_name(name, self.tenant_id, &self.domain)
                        .await?
                }
            };
        }

        for listener in self.registry.listeners() {
            if let HookOutcome::Veto = listener
                .post_get_group_id_by_name(name, &mut group_id, self)
                .await?
            {
                break;
            }
        }

        Ok(group_id)
    }

    pub async fn list_groups(
        &self,
        condition: Option<&Condition>,
        params: &GroupListParams,
    ) -> JanusResult<Vec<Group>> {
        let mut proceed = true;
        for listener in self.registry.listeners() {
            match listener.pre_list_groups(condition, params, self).await? {
                HookOutcome::Proceed => {}
                HookOutcome::Veto => {
                    proceed = false;
                    break;
                }
            }
        }

        let mut groups: Vec<Group> = Vec::new();
        if proceed {
            groups = match self.resolve_list_groups(condition, params).await? {
                Resolution::Resolved(resolved) => resolved,
                Resolution::Declined => {
                    self.directory
                        .list_groups(condition, params, self.tenant_id)
                        .await?
                }
            };
        }

        for listener in self.registry.listeners() {
            if let HookOutcome::Veto = listener
                .post_list_groups(condition, params, &mut groups, self)
                .await?
            {
                break;
            }
        }

        Ok(groups)
    }

    pub async fn get_groups_of_user(&self, user_id: &str) -> JanusResult<Vec<Group>> {
        let mut proceed = true;
        for listener in self.registry.listeners() {
            match listener.pre_get_groups_of_user(user_id, self).await? {
                HookOutcome::Proceed => {}
                HookOutcome::Veto => {
                    proceed = false;
                    break;
                }
            }
        }

        let mut groups: Vec<Group> = Vec::new();
        if proceed {
            groups = match self.resolve_groups_of_user(user_id).await? {
                Resolution::Resolved(resolved) => resolved,
                Resolution::Declined => {
                    self.directory
                        .get_groups_of_user(user_id, self.tenant_id)
                        .await?
                }
            };
        }

        for listener in self.registry.listeners() {
            if let HookOutcome::Veto = listener
                .post_get_groups_of_user(user_id, &mut groups, self)
                .await?
            {
                break;
            }
        }

        Ok(groups)
    }

    /// Resolve which user-store domain owns the group with the given
    /// ID. Consults the resolver chain first and falls back to a
    /// directory lookup; no listener hooks participate.
    pub async fn get_group_domain_by_id(&self, group_id: &str) -> JanusResult<Option<String>> {
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(domain) = resolver
                .group_domain_by_id(group_id, self.tenant_id)
                .await?
            {
                return Ok(Some(domain));
            }
        }

        Ok(self
            .directory
            .get_group_by_id(group_id, &[], self.tenant_id)
            .await?
            .map(|group| group.domain))
    }

    // -------------------------------------------------------------------
    // Mutation path
    // -------------------------------------------------------------------

    pub async fn add_group(
        &self,
        name: &str,
        members: &[String],
        location: Option<&str>,
    ) -> JanusResult<Option<Group>> {
        let mut proceed = true;
        for listener in self.registry.listeners() {
            match listener.pre_add_group(name, members, self).await? {
                HookOutcome::Proceed => {}
                HookOutcome::Veto => {
                    debug!(
                        name,
                        order = listener.execution_order_id(),
                        "add_group vetoed by pre-listener"
                    );
                    proceed = false;
                    break;
                }
            }
        }

        let mut group: Option<Group> = None;
        if proceed {
            group = match self.resolve_add_group(name, location).await? {
                Resolution::Resolved(resolved) => {
                    debug!(name, group_id = %resolved.id, "add_group handled by resolver");
                    Some(resolved)
                }
                Resolution::Declined => Some(
                    self.directory
                        .add_group(NewGroup {
                            name: name.to_owned(),
                            domain: self.domain.clone(),
                            tenant_id: self.tenant_id,
                            members: members.to_vec(),
                            location: location.map(str::to_owned),
                            attributes: Default::default(),
                        })
                        .await?,
                ),
            };
        }

        for listener in self.registry.listeners() {
            if let HookOutcome::Veto = listener
                .post_add_group(name, members, &mut group, self)
                .await?
            {
                break;
            }
        }

        Ok(group)
    }

    pub async fn delete_group(&self, name: &str) -> JanusResult<bool> {
        let mut proceed = true;
        for listener in self.registry.listeners() {
            match listener.pre_delete_group(name, self).await? {
                HookOutcome::Proceed => {}
                HookOutcome::Veto => {
                    debug!(
                        name,
                        order = listener.execution_order_id(),
                        "delete_group vetoed by pre-listener"
                    );
                    proceed = false;
                    break;
                }
            }
        }

        let mut deleted = false;
        if proceed {
            deleted = match self.resolve_delete_group(name).await? {
                Resolution::Resolved(()) => true,
                Resolution::Declined => {
                    self.directory
                        .delete_group(name, self.tenant_id, &self.domain)
                        .await?
                }
            };
        }

        for listener in self.registry.listeners() {
            if let HookOutcome::Veto = listener.post_delete_group(name, deleted, self).await? {
                break;
            }
        }

        Ok(deleted)
    }

    pub async fn update_group_name(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> JanusResult<Option<Group>> {
        let mut proceed = true;
        for listener in self.registry.listeners() {
            match listener
                .pre_update_group_name(old_name, new_name, self)
                .await?
            {
                HookOutcome::Proceed => {}
                HookOutcome::Veto => {
                    proceed = false;
                    break;
                }
            }
        }

        let mut group: Option<Group> = None;
        if proceed {
            group = match self.resolve_update_group_name(old_name, new_name).await? {
                Resolution::Resolved(resolved) => Some(resolved),
                Resolution::Declined => Some(
                    self.directory
                        .update_group_name(old_name, new_name, self.tenant_id, &self.domain)
                        .await?,
                ),
            };
        }

        for listener in self.registry.listeners() {
            if let HookOutcome::Veto = listener
                .post_update_group_name(old_name, new_name, &mut group, self)
                .await?
            {
                break;
            }
        }

        Ok(group)
    }

    // -------------------------------------------------------------------
    // Resolver chain
    //
    // Enabled resolvers are consulted in ascending execution order;
    // resolution stops at the first `Resolved`. The enabled flag is
    // read immediately before each call.
    // -------------------------------------------------------------------

    async fn resolve_group_by_id(
        &self,
        group_id: &str,
        requested_claims: &[String],
    ) -> JanusResult<Resolution<Group>> {
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(group) = resolver
                .group_by_id(group_id, requested_claims, self)
                .await?
            {
                return Ok(Resolution::Resolved(group));
            }
        }
        Ok(Resolution::Declined)
    }

    async fn resolve_group_name_by_id(&self, group_id: &str) -> JanusResult<Resolution<String>> {
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(name) = resolver.group_name_by_id(group_id, self).await? {
                return Ok(Resolution::Resolved(name));
            }
        }
        Ok(Resolution::Declined)
    }

    async fn resolve_group_by_name(
        &self,
        name: &str,
        requested_claims: &[String],
    ) -> JanusResult<Resolution<Group>> {
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(group) =
                resolver.group_by_name(name, requested_claims, self).await?
            {
                return Ok(Resolution::Resolved(group));
            }
        }
        Ok(Resolution::Declined)
    }

    async fn resolve_group_id_by_name(&self, name: &str) -> JanusResult<Resolution<String>> {
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(group_id) = resolver.group_id_by_name(name, self).await? {
                return Ok(Resolution::Resolved(group_id));
            }
        }
        Ok(Resolution::Declined)
    }

    async fn resolve_list_groups(
        &self,
        condition: Option<&Condition>,
        params: &GroupListParams,
    ) -> JanusResult<Resolution<Vec<Group>>> {
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(groups) =
                resolver.list_groups(condition, params, self).await?
            {
                return Ok(Resolution::Resolved(groups));
            }
        }
        Ok(Resolution::Declined)
    }

    async fn resolve_groups_of_user(&self, user_id: &str) -> JanusResult<Resolution<Vec<Group>>> {
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(groups) = resolver.groups_of_user(user_id, self).await? {
                return Ok(Resolution::Resolved(groups));
            }
        }
        Ok(Resolution::Declined)
    }

    async fn resolve_add_group(
        &self,
        name: &str,
        location: Option<&str>,
    ) -> JanusResult<Resolution<Group>> {
        let now = Utc::now();
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(group) = resolver
                .add_group(name, None, now, now, location, self.tenant_id)
                .await?
            {
                return Ok(Resolution::Resolved(group));
            }
        }
        Ok(Resolution::Declined)
    }

    async fn resolve_delete_group(&self, name: &str) -> JanusResult<Resolution<()>> {
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(()) = resolver.delete_group(name, self.tenant_id).await? {
                return Ok(Resolution::Resolved(()));
            }
        }
        Ok(Resolution::Declined)
    }

    async fn resolve_update_group_name(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> JanusResult<Resolution<Group>> {
        for resolver in self.registry.resolvers() {
            if !resolver.is_enabled() {
                continue;
            }
            if let Resolution::Resolved(group) = resolver
                .update_group_name(old_name, new_name, self.tenant_id)
                .await?
            {
                return Ok(Resolution::Resolved(group));
            }
        }
        Ok(Resolution::Declined)
    }
}
