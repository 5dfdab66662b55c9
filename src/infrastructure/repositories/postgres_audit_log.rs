// src/infrastructure/repositories/postgres_audit_log.rs
use super::{cancellable, count_to_u64, map_sqlx, push_condition, push_ordering, push_page};
use crate::domain::audit::{
    AuditLog, AuditLogFilter, AuditLogRepository, AuditSortField, NewAuditLog,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::query::{PageQuery, PagedSource};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const SEARCH_COLUMNS: [&str; 5] = ["user_name", "user_email", "message", "request", "client_address"];

#[derive(Clone)]
pub struct PostgresAuditLogRepository {
    pool: PgPool,
}

impl PostgresAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    id: i64,
    event: String,
    result: String,
    client_address: String,
    message: Option<String>,
    request: Option<String>,
    user_id: Option<Uuid>,
    user_name: Option<String>,
    user_email: Option<String>,
    location: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AuditLogRow> for AuditLog {
    type Error = DomainError;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        Ok(AuditLog {
            id: row.id,
            event: row.event.parse()?,
            result: row.result.parse()?,
            client_address: row.client_address,
            message: row.message,
            request: row.request,
            user_id: row.user_id.map(UserId::new).transpose()?,
            user_name: row.user_name,
            user_email: row.user_email,
            location: row.location,
            created_at: row.created_at,
        })
    }
}

impl PostgresAuditLogRepository {
    fn apply_conditions(builder: &mut QueryBuilder<'_, Postgres>, filter: &AuditLogFilter) {
        let mut has_where = false;
        if !filter.events.is_empty() {
            let events: Vec<String> = filter.events.iter().map(|e| e.as_str().to_string()).collect();
            push_condition(builder, &mut has_where);
            builder.push("event = ANY(");
            builder.push_bind(events);
            builder.push(")");
        }

        if !filter.results.is_empty() {
            let results: Vec<String> = filter.results.iter().map(|r| r.as_str().to_string()).collect();
            push_condition(builder, &mut has_where);
            builder.push("result = ANY(");
            builder.push_bind(results);
            builder.push(")");
        }

        if let Some(term) = &filter.search {
            let pattern = term.like_pattern();
            push_condition(builder, &mut has_where);
            builder.push("(");
            for (index, column) in SEARCH_COLUMNS.iter().enumerate() {
                if index > 0 {
                    builder.push(" OR ");
                }
                builder.push(*column);
                builder.push(" ILIKE ");
                builder.push_bind(pattern.clone());
            }
            builder.push(")");
        }
    }

    fn slice_query(query: &PageQuery<AuditLogFilter, AuditSortField>) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(
            "SELECT id, event, result, client_address, message, request, user_id, user_name, \
             user_email, location, created_at FROM audit_logs",
        );
        Self::apply_conditions(&mut builder, &query.filter);
        push_ordering(&mut builder, &query.sort, "id DESC");
        push_page(&mut builder, &query.page);
        builder
    }

    fn count_query(filter: &AuditLogFilter) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM audit_logs");
        Self::apply_conditions(&mut builder, filter);
        builder
    }
}

#[async_trait]
impl PagedSource<AuditLogFilter, AuditSortField, AuditLog> for PostgresAuditLogRepository {
    async fn fetch_slice(
        &self,
        query: &PageQuery<AuditLogFilter, AuditSortField>,
        cancel: &CancellationToken,
    ) -> DomainResult<Vec<AuditLog>> {
        cancellable(cancel, async {
            let mut builder = Self::slice_query(query);
            builder
                .build_query_as::<AuditLogRow>()
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?
                .into_iter()
                .map(AuditLog::try_from)
                .collect()
        })
        .await
    }

    async fn count_matching(
        &self,
        filter: &AuditLogFilter,
        cancel: &CancellationToken,
    ) -> DomainResult<u64> {
        cancellable(cancel, async {
            let mut builder = Self::count_query(filter);
            let count: i64 = builder
                .build_query_scalar()
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx)?;
            Ok(count_to_u64(count))
        })
        .await
    }
}

#[async_trait]
impl AuditLogRepository for PostgresAuditLogRepository {
    async fn append(&self, log: NewAuditLog, cancel: &CancellationToken) -> DomainResult<bool> {
        cancellable(cancel, async {
            let inserted = sqlx::query(
                r#"
                INSERT INTO audit_logs (event, result, client_address, message, request, user_id,
                                        user_name, user_email, location, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(log.event.as_str())
            .bind(log.result.as_str())
            .bind(log.client_address)
            .bind(log.message)
            .bind(log.request)
            .bind(log.user_id.map(Uuid::from))
            .bind(log.user_name)
            .bind(log.user_email)
            .bind(log.location)
            .bind(log.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?
            .rows_affected();

            Ok(inserted == 1)
        })
        .await
    }
}
