pub mod auth;
pub mod batch;
pub mod order;
pub mod pizza;
pub mod review;
pub mod schema;
pub mod seed;
pub mod settings;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crustops_core::{merge_patch, now_rfc3339, ServiceError};
use crustops_sql::{SQLStore, Value};

use crate::notify::Notifier;

/// Configuration for the shop service.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// OTP code lifetime in seconds (default: 10 minutes).
    pub otp_ttl_secs: i64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            otp_ttl_secs: 600,
        }
    }
}

/// Effectively-unbounded limit for internal full-table reads.
pub(crate) const NO_LIMIT: usize = i64::MAX as usize;

/// Shop service — holds the storage backend, the notifier seam and
/// provides all storefront business logic.
pub struct ShopService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) config: ShopConfig,
}

impl ShopService {
    /// Create a new ShopService, initializing the DB schema.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        notifier: Arc<dyn Notifier>,
        config: ShopConfig,
    ) -> Result<Arc<Self>, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, notifier, config }))
    }

    // ── Generic CRUD helpers ──

    /// Insert a record as JSON into a table with indexed columns.
    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), ServiceError> {
        let json = serde_json::to_string(record)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            cols.push(col);
            placeholders.push(format!("?{}", i + 3));
            params.push(val.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            cols.join(", "),
            placeholders.join(", "),
        );

        self.sql.exec(&sql, &params).map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                ServiceError::Conflict(msg)
            } else {
                ServiceError::Storage(msg)
            }
        })?;

        Ok(())
    }

    /// Get a record by id, deserializing the JSON `data` column.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
    ) -> Result<T, ServiceError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self.sql
            .query(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let row = rows.first()
            .ok_or_else(|| ServiceError::NotFound(format!("{}/{}", table, id)))?;
        let data = row.get_str("data")
            .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
        serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Update a record's JSON data and indexed columns.
    pub(crate) fn update_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), ServiceError> {
        let json = serde_json::to_string(record)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut sets = vec!["data = ?1".to_string()];
        let mut params: Vec<Value> = vec![Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            sets.push(format!("{} = ?{}", col, i + 2));
            params.push(val.clone());
        }

        let id_idx = params.len() + 1;
        params.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            table,
            sets.join(", "),
            id_idx,
        );

        let affected = self.sql
            .exec(&sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        if affected == 0 {
            return Err(ServiceError::NotFound(format!("{}/{}", table, id)));
        }

        Ok(())
    }

    /// Delete a record by id.
    pub(crate) fn delete_record(&self, table: &str, id: &str) -> Result<(), ServiceError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", table);
        let affected = self.sql
            .exec(&sql, &[Value::Text(id.to_string())])
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        if affected == 0 {
            return Err(ServiceError::NotFound(format!("{}/{}", table, id)));
        }
        Ok(())
    }

    /// List records with optional equality filters, ordered by an
    /// indexed column, with pagination.
    pub(crate) fn list_records<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, Value)],
        order_by: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<T>, ServiceError> {
        let mut where_clauses = Vec::new();
        let mut params = Vec::new();

        for (i, (col, val)) in filters.iter().enumerate() {
            where_clauses.push(format!("{} = ?{}", col, i + 1));
            params.push(val.clone());
        }

        let where_sql = if where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_clauses.join(" AND "))
        };

        let limit_idx = params.len() + 1;
        let offset_idx = params.len() + 2;
        params.push(Value::Integer(limit as i64));
        params.push(Value::Integer(offset as i64));

        let sql = format!(
            "SELECT data FROM {}{} ORDER BY {} LIMIT ?{} OFFSET ?{}",
            table, where_sql, order_by, limit_idx, offset_idx,
        );

        let rows = self.sql
            .query(&sql, &params)
            .map_err(|e| ServiceError::Storage(e.to_string()))?;

        let mut items = Vec::new();
        for row in &rows {
            let data = row.get_str("data")
                .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
            let item: T = serde_json::from_str(data)
                .map_err(|e| ServiceError::Internal(e.to_string()))?;
            items.push(item);
        }

        Ok(items)
    }

    /// Apply a JSON merge-patch to a record, protecting immutable fields.
    pub(crate) fn apply_patch<T: Serialize + DeserializeOwned>(
        current: &T,
        patch: serde_json::Value,
    ) -> Result<T, ServiceError> {
        let mut json = serde_json::to_value(current)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let mut patch_filtered = patch;
        if let Some(obj) = patch_filtered.as_object_mut() {
            obj.remove("id");
            obj.remove("createdAt");
        }

        merge_patch(&mut json, &patch_filtered);
        serde_json::from_value(json).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    pub(crate) fn now() -> String {
        now_rfc3339()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crustops_sql::SqliteStore;

    use crate::notify::testing::RecordingNotifier;
    use crate::notify::Notifier;

    use super::{ShopConfig, ShopService};

    /// A service over in-memory SQLite with a recording notifier.
    pub fn test_service() -> (Arc<ShopService>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let svc = test_service_with(notifier.clone(), ShopConfig::default());
        (svc, notifier)
    }

    pub fn test_service_with(
        notifier: Arc<dyn Notifier>,
        config: ShopConfig,
    ) -> Arc<ShopService> {
        let sql = Arc::new(SqliteStore::open_in_memory().unwrap());
        ShopService::new(sql, notifier, config).unwrap()
    }
}
