//! SurrealDB implementation of [`GroupDirectory`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use janus_core::directory::GroupDirectory;
use janus_core::error::JanusResult;
use janus_core::models::condition::{Condition, ExpressionOperator};
use janus_core::models::group::{Group, GroupListParams, NewGroup};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the group ID is already known.
#[derive(Debug, SurrealValue)]
struct GroupRow {
    tenant_id: i64,
    domain: String,
    name: String,
    location: Option<String>,
    attributes: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct GroupRowWithId {
    record_id: String,
    tenant_id: i64,
    domain: String,
    name: String,
    location: Option<String>,
    attributes: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row struct for single-field name lookups.
#[derive(Debug, SurrealValue)]
struct NameRow {
    name: String,
}

/// Row struct for single-field ID lookups.
#[derive(Debug, SurrealValue)]
struct IdRow {
    record_id: String,
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn row_into_group(id: String, row: GroupRow, requested_claims: &[String]) -> Group {
    Group {
        id,
        name: row.name,
        domain: row.domain,
        tenant_id: row.tenant_id as i32,
        created_at: row.created_at,
        updated_at: row.updated_at,
        location: row.location,
        attributes: filter_attributes(&row.attributes, requested_claims),
    }
}

impl GroupRowWithId {
    fn into_group(self, requested_claims: &[String]) -> Group {
        Group {
            id: self.record_id,
            name: self.name,
            domain: self.domain,
            tenant_id: self.tenant_id as i32,
            created_at: self.created_at,
            updated_at: self.updated_at,
            location: self.location,
            attributes: filter_attributes(&self.attributes, requested_claims),
        }
    }
}

/// Project the stored attribute object down to the requested claims.
/// An empty request populates nothing.
fn filter_attributes(attributes: &serde_json::Value, requested: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for claim in requested {
        if let Some(value) = attributes.get(claim) {
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            map.insert(claim.clone(), rendered);
        }
    }
    map
}

/// Translate a condition tree into a SurrealQL predicate, collecting
/// bind values under generated names. Filterable fields are
/// whitelisted; anything else is rejected rather than interpolated.
fn render_condition(
    condition: &Condition,
    binds: &mut Vec<(String, String)>,
) -> Result<String, DbError> {
    match condition {
        Condition::Expression(expr) => {
            let field = filter_field(&expr.field)?;
            let key = format!("c{}", binds.len());
            let clause = match expr.operator {
                ExpressionOperator::Eq => format!("{field} = ${key}"),
                ExpressionOperator::Sw => format!("string::starts_with({field}, ${key})"),
                ExpressionOperator::Ew => format!("string::ends_with({field}, ${key})"),
                ExpressionOperator::Co => format!("{field} CONTAINS ${key}"),
                ExpressionOperator::Ge => format!("{field} >= ${key}"),
                ExpressionOperator::Le => format!("{field} <= ${key}"),
            };
            binds.push((key, expr.value.clone()));
            Ok(clause)
        }
        Condition::And(left, right) => Ok(format!(
            "({} AND {})",
            render_condition(left, binds)?,
            render_condition(right, binds)?
        )),
        Condition::Or(left, right) => Ok(format!(
            "({} OR {})",
            render_condition(left, binds)?,
            render_condition(right, binds)?
        )),
    }
}

fn filter_field(field: &str) -> Result<&'static str, DbError> {
    match field {
        "name" => Ok("name"),
        "location" => Ok("location"),
        "created_at" => Ok("created_at"),
        "updated_at" => Ok("updated_at"),
        other => Err(DbError::UnsupportedFilter(other.to_string())),
    }
}

fn sort_field(sort_by: Option<&str>) -> Result<&'static str, DbError> {
    match sort_by {
        None => Ok("created_at"),
        Some(field) => filter_field(field),
    }
}

/// SurrealDB implementation of the group directory boundary.
#[derive(Clone)]
pub struct SurrealGroupDirectory<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealGroupDirectory<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn group_id_for_name(
        &self,
        name: &str,
        tenant_id: i32,
        domain: &str,
    ) -> Result<Option<String>, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id FROM group \
                 WHERE tenant_id = $tenant_id AND domain = $domain \
                 AND name = $name",
            )
            .bind(("tenant_id", tenant_id as i64))
            .bind(("domain", domain.to_owned()))
            .bind(("name", name.to_owned()))
            .await?;

        let rows: Vec<IdRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|row| row.record_id))
    }

    async fn name_taken(&self, name: &str, tenant_id: i32, domain: &str) -> Result<bool, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM group \
                 WHERE tenant_id = $tenant_id AND domain = $domain \
                 AND name = $name GROUP ALL",
            )
            .bind(("tenant_id", tenant_id as i64))
            .bind(("domain", domain.to_owned()))
            .bind(("name", name.to_owned()))
            .await?;

        let counts: Vec<CountRow> = result.take(0)?;
        Ok(counts.first().map(|row| row.total).unwrap_or(0) > 0)
    }
}

#[async_trait]
impl<C: Connection> GroupDirectory for SurrealGroupDirectory<C> {
    async fn get_group_by_id(
        &self,
        group_id: &str,
        requested_claims: &[String],
        tenant_id: i32,
    ) -> JanusResult<Option<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('group', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", group_id.to_owned()))
            .bind(("tenant_id", tenant_id as i64))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| row_into_group(group_id.to_owned(), row, requested_claims)))
    }

    async fn get_group_name_by_id(
        &self,
        group_id: &str,
        tenant_id: i32,
    ) -> JanusResult<Option<String>> {
        let mut result = self
            .db
            .query(
                "SELECT name FROM type::record('group', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", group_id.to_owned()))
            .bind(("tenant_id", tenant_id as i64))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<NameRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().next().map(|row| row.name))
    }

    async fn get_group_by_name(
        &self,
        name: &str,
        requested_claims: &[String],
        tenant_id: i32,
        domain: &str,
    ) -> JanusResult<Option<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE tenant_id = $tenant_id AND domain = $domain \
                 AND name = $name",
            )
            .bind(("tenant_id", tenant_id as i64))
            .bind(("domain", domain.to_owned()))
            .bind(("name", name.to_owned()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.into_group(requested_claims)))
    }

    async fn get_group_id_by_name(
        &self,
        name: &str,
        tenant_id: i32,
        domain: &str,
    ) -> JanusResult<Option<String>> {
        Ok(self.group_id_for_name(name, tenant_id, domain).await?)
    }

    async fn list_groups(
        &self,
        condition: Option<&Condition>,
        params: &GroupListParams,
        tenant_id: i32,
    ) -> JanusResult<Vec<Group>> {
        let mut sql = String::from(
            "SELECT meta::id(id) AS record_id, * FROM group \
             WHERE tenant_id = $tenant_id AND domain = $domain",
        );

        let mut binds: Vec<(String, String)> = Vec::new();
        if let Some(condition) = condition {
            let clause = render_condition(condition, &mut binds)?;
            sql.push_str(" AND ");
            sql.push_str(&clause);
        }

        sql.push_str(&format!(
            " ORDER BY {} {}",
            sort_field(params.sort_by.as_deref())?,
            params.sort_order.as_str()
        ));

        // limit <= 0 means unbounded, per directory convention.
        if params.limit > 0 {
            sql.push_str(" LIMIT $limit");
        }
        if params.offset > 0 {
            sql.push_str(" START $offset");
        }

        let mut query = self
            .db
            .query(sql)
            .bind(("tenant_id", tenant_id as i64))
            .bind(("domain", params.domain.clone()));
        for (key, value) in binds {
            query = query.bind((key, value));
        }
        if params.limit > 0 {
            query = query.bind(("limit", params.limit as i64));
        }
        if params.offset > 0 {
            query = query.bind(("offset", params.offset as i64));
        }

        let mut result = query.await.map_err(DbError::from)?;
        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().map(|row| row.into_group(&[])).collect())
    }

    async fn get_groups_of_user(
        &self,
        user_id: &str,
        tenant_id: i32,
    ) -> JanusResult<Vec<Group>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM group \
                 WHERE tenant_id = $tenant_id \
                 AND id IN (\
                     SELECT VALUE out FROM member_of \
                     WHERE in = type::record('user', $user_id)\
                 )",
            )
            .bind(("tenant_id", tenant_id as i64))
            .bind(("user_id", user_id.to_owned()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GroupRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(|row| row.into_group(&[])).collect())
    }

    async fn add_group(&self, group: NewGroup) -> JanusResult<Group> {
        if self
            .name_taken(&group.name, group.tenant_id, &group.domain)
            .await?
        {
            return Err(DbError::AlreadyExists {
                name: group.name,
                domain: group.domain,
            }
            .into());
        }

        let id = Uuid::new_v4().to_string();
        let attributes = serde_json::Value::Object(
            group
                .attributes
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::String(value)))
                .collect(),
        );

        let result = self
            .db
            .query(
                "CREATE type::record('group', $id) SET \
                 tenant_id = $tenant_id, domain = $domain, \
                 name = $name, location = $location, \
                 attributes = $attributes",
            )
            .bind(("id", id.clone()))
            .bind(("tenant_id", group.tenant_id as i64))
            .bind(("domain", group.domain))
            .bind(("name", group.name))
            .bind(("location", group.location))
            .bind(("attributes", attributes))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            id: id.clone(),
        })?;

        // Enroll initial members via membership edges.
        for member in &group.members {
            self.db
                .query(format!(
                    "RELATE user:`{member}` -> member_of -> group:`{id}`"
                ))
                .await
                .map_err(DbError::from)?;
        }

        Ok(row_into_group(id, row, &[]))
    }

    async fn delete_group(&self, name: &str, tenant_id: i32, domain: &str) -> JanusResult<bool> {
        let Some(id) = self.group_id_for_name(name, tenant_id, domain).await? else {
            return Ok(false);
        };

        // Delete associated membership edges first, then the group record.
        let query = format!(
            "DELETE member_of WHERE out = group:`{id}`; \
             DELETE type::record('group', $id);"
        );

        self.db
            .query(query)
            .bind(("id", id))
            .await
            .map_err(DbError::from)?;

        Ok(true)
    }

    async fn update_group_name(
        &self,
        old_name: &str,
        new_name: &str,
        tenant_id: i32,
        domain: &str,
    ) -> JanusResult<Group> {
        if self.name_taken(new_name, tenant_id, domain).await? {
            return Err(DbError::AlreadyExists {
                name: new_name.to_owned(),
                domain: domain.to_owned(),
            }
            .into());
        }

        let id = self
            .group_id_for_name(old_name, tenant_id, domain)
            .await?
            .ok_or_else(|| DbError::NotFound {
                id: old_name.to_owned(),
            })?;

        let result = self
            .db
            .query(
                "UPDATE type::record('group', $id) SET \
                 name = $new_name, updated_at = time::now()",
            )
            .bind(("id", id.clone()))
            .bind(("new_name", new_name.to_owned()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;
        let rows: Vec<GroupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound { id: id.clone() })?;

        Ok(row_into_group(id, row, &[]))
    }
}
