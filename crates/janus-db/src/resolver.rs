//! DB-backed group-ID mapping resolver.
//!
//! Carries group-ID semantics for user stores that cannot: the mapping
//! table owns the ID-to-name association, so this resolver mints IDs on
//! create and answers every ID-keyed lookup from the mapping. Listing
//! and membership operations are declined, since a pure mapping cannot
//! answer them; they fall through to the underlying directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use janus_core::error::JanusResult;
use janus_core::manager::GroupManager;
use janus_core::models::group::Group;
use janus_core::resolver::{GroupResolver, Resolution};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for mapping queries where the ID is known.
#[derive(Debug, SurrealValue)]
struct MappingRow {
    tenant_id: i64,
    domain: String,
    name: String,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct MappingRowWithId {
    record_id: String,
    tenant_id: i64,
    domain: String,
    name: String,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn mapping_into_group(id: String, row: MappingRow) -> Group {
    Group {
        id,
        name: row.name,
        domain: row.domain,
        tenant_id: row.tenant_id as i32,
        created_at: row.created_at,
        updated_at: row.updated_at,
        location: row.location,
        attributes: Default::default(),
    }
}

impl MappingRowWithId {
    fn into_group(self) -> Group {
        Group {
            id: self.record_id,
            name: self.name,
            domain: self.domain,
            tenant_id: self.tenant_id as i32,
            created_at: self.created_at,
            updated_at: self.updated_at,
            location: self.location,
            attributes: Default::default(),
        }
    }
}

/// Group resolver backed by a `group_mapping` table.
#[derive(Clone)]
pub struct MappedGroupResolver<C: Connection> {
    db: Surreal<C>,
    domain: String,
    enabled: bool,
    execution_order_id: i32,
}

impl<C: Connection> MappedGroupResolver<C> {
    pub fn new(db: Surreal<C>, domain: impl Into<String>) -> Self {
        Self {
            db,
            domain: domain.into(),
            enabled: true,
            execution_order_id: 10,
        }
    }

    pub fn with_execution_order(mut self, execution_order_id: i32) -> Self {
        self.execution_order_id = execution_order_id;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    async fn mapping_by_id(
        &self,
        group_id: &str,
        tenant_id: i32,
    ) -> Result<Option<MappingRow>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('group_mapping', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", group_id.to_owned()))
            .bind(("tenant_id", tenant_id as i64))
            .await?;

        let rows: Vec<MappingRow> = result.take(0)?;
        Ok(rows.into_iter().next())
    }

    async fn mapping_by_name(
        &self,
        name: &str,
        tenant_id: i32,
    ) -> Result<Option<MappingRowWithId>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group_mapping \
                 WHERE tenant_id = $tenant_id AND domain = $domain \
                 AND name = $name",
            )
            .bind(("tenant_id", tenant_id as i64))
            .bind(("domain", self.domain.clone()))
            .bind(("name", name.to_owned()))
            .await?;

        let rows: Vec<MappingRowWithId> = result.take(0)?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl<C: Connection> GroupResolver for MappedGroupResolver<C> {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn execution_order_id(&self) -> i32 {
        self.execution_order_id
    }

    async fn group_domain_by_id(
        &self,
        group_id: &str,
        tenant_id: i32,
    ) -> JanusResult<Resolution<String>> {
        match self.mapping_by_id(group_id, tenant_id).await? {
            Some(row) => Ok(Resolution::Resolved(row.domain)),
            None => Ok(Resolution::Declined),
        }
    }

    async fn group_id_by_name(
        &self,
        name: &str,
        manager: &GroupManager,
    ) -> JanusResult<Resolution<String>> {
        match self.mapping_by_name(name, manager.tenant_id()).await? {
            Some(row) => Ok(Resolution::Resolved(row.record_id)),
            None => Ok(Resolution::Declined),
        }
    }

    async fn group_name_by_id(
        &self,
        group_id: &str,
        manager: &GroupManager,
    ) -> JanusResult<Resolution<String>> {
        match self.mapping_by_id(group_id, manager.tenant_id()).await? {
            Some(row) => Ok(Resolution::Resolved(row.name)),
            None => Ok(Resolution::Declined),
        }
    }

    async fn group_by_id(
        &self,
        group_id: &str,
        _requested_claims: &[String],
        manager: &GroupManager,
    ) -> JanusResult<Resolution<Group>> {
        match self.mapping_by_id(group_id, manager.tenant_id()).await? {
            Some(row) => Ok(Resolution::Resolved(mapping_into_group(
                group_id.to_owned(),
                row,
            ))),
            None => Ok(Resolution::Declined),
        }
    }

    async fn group_by_name(
        &self,
        name: &str,
        _requested_claims: &[String],
        manager: &GroupManager,
    ) -> JanusResult<Resolution<Group>> {
        match self.mapping_by_name(name, manager.tenant_id()).await? {
            Some(row) => Ok(Resolution::Resolved(row.into_group())),
            None => Ok(Resolution::Declined),
        }
    }

    async fn add_group(
        &self,
        name: &str,
        group_id: Option<&str>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        location: Option<&str>,
        tenant_id: i32,
    ) -> JanusResult<Resolution<Group>> {
        let id = group_id
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut result = self
            .db
            .query(
                "CREATE type::record('group_mapping', $id) SET \
                 tenant_id = $tenant_id, domain = $domain, \
                 name = $name, location = $location, \
                 created_at = <datetime> $created_at, \
                 updated_at = <datetime> $updated_at",
            )
            .bind(("id", id.clone()))
            .bind(("tenant_id", tenant_id as i64))
            .bind(("domain", self.domain.clone()))
            .bind(("name", name.to_owned()))
            .bind(("location", location.map(str::to_owned)))
            .bind(("created_at", created_at.to_rfc3339()))
            .bind(("updated_at", updated_at.to_rfc3339()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MappingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound { id: id.clone() })?;

        Ok(Resolution::Resolved(mapping_into_group(id, row)))
    }

    async fn delete_group(&self, name: &str, tenant_id: i32) -> JanusResult<Resolution<()>> {
        let Some(row) = self.mapping_by_name(name, tenant_id).await? else {
            return Ok(Resolution::Declined);
        };

        self.db
            .query("DELETE type::record('group_mapping', $id)")
            .bind(("id", row.record_id))
            .await
            .map_err(DbError::from)?;

        Ok(Resolution::Resolved(()))
    }

    async fn update_group_name(
        &self,
        old_name: &str,
        new_name: &str,
        tenant_id: i32,
    ) -> JanusResult<Resolution<Group>> {
        let Some(row) = self.mapping_by_name(old_name, tenant_id).await? else {
            return Ok(Resolution::Declined);
        };

        let id = row.record_id;
        let mut result = self
            .db
            .query(
                "UPDATE type::record('group_mapping', $id) SET \
                 name = $new_name, updated_at = time::now()",
            )
            .bind(("id", id.clone()))
            .bind(("new_name", new_name.to_owned()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MappingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound { id: id.clone() })?;

        Ok(Resolution::Resolved(mapping_into_group(id, row)))
    }
}
