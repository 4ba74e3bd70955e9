//! Asset requests repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::asset_request::{AssetRequest, NewAssetRequest, RequestStatus},
};

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Whether the employee already has a request for the same asset
    pub async fn exists_duplicate(&self, data: &NewAssetRequest) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM asset_requests
                WHERE employee_id = $1
                  AND asset_type = $2
                  AND COALESCE(other_asset_name, '') = COALESCE($3, '')
            )
            "#,
        )
        .bind(&data.employee_id)
        .bind(data.asset_type)
        .bind(&data.other_asset_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new pending request
    pub async fn create(&self, data: &NewAssetRequest) -> AppResult<AssetRequest> {
        sqlx::query_as::<_, AssetRequest>(
            r#"
            INSERT INTO asset_requests
                (employee_name, employee_id, asset_type, other_asset_name, reason, request_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.employee_name)
        .bind(&data.employee_id)
        .bind(data.asset_type)
        .bind(&data.other_asset_name)
        .bind(&data.reason)
        .bind(data.request_date)
        .bind(RequestStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // A concurrent submission won the race on the unique index
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                    return data.duplicate_error();
                }
            }
            AppError::Database(e)
        })
    }

    /// List requests, optionally filtered by status and employee name
    pub async fn list(
        &self,
        status: Option<&str>,
        search: Option<&str>,
    ) -> AppResult<Vec<AssetRequest>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }
        if search.is_some() {
            conditions.push(format!(r"employee_name ILIKE ${} ESCAPE '\'", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT * FROM asset_requests {} ORDER BY id", where_clause);

        let mut builder = sqlx::query_as::<_, AssetRequest>(&query);
        if let Some(status) = status {
            builder = builder.bind(status);
        }
        if let Some(search) = search {
            builder = builder.bind(contains_pattern(search));
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Set the status of a request
    pub async fn update_status(&self, id: i32, status: RequestStatus) -> AppResult<AssetRequest> {
        sqlx::query_as::<_, AssetRequest>(
            "UPDATE asset_requests SET status = $1 WHERE id = $2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".to_string()))
    }

    /// Delete the given requests, returning how many existed
    pub async fn delete_many(&self, ids: &[i32]) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM asset_requests WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every request
    pub async fn clear(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM asset_requests")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// ILIKE pattern matching `text` anywhere, with wildcards taken literally
fn contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
