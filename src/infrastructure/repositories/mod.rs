// src/infrastructure/repositories/mod.rs
mod error;
mod postgres_audit_log;
mod postgres_group;
mod postgres_organization;

pub use error::map_sqlx;
pub use postgres_audit_log::PostgresAuditLogRepository;
pub use postgres_group::PostgresGroupRepository;
pub use postgres_organization::PostgresOrganizationRepository;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::query::{PageRequest, SortField, SortKey};
use sqlx::{Postgres, QueryBuilder};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Runs `work` unless `cancel` fires first. Dropping an in-flight
/// transaction rolls it back.
pub(crate) async fn cancellable<T, F>(cancel: &CancellationToken, work: F) -> DomainResult<T>
where
    F: Future<Output = DomainResult<T>>,
{
    if cancel.is_cancelled() {
        return Err(DomainError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DomainError::Cancelled),
        result = work => result,
    }
}

/// Pushes ` WHERE ` for the first condition and ` AND ` for the rest.
pub(crate) fn push_condition(builder: &mut QueryBuilder<'_, Postgres>, has_where: &mut bool) {
    if *has_where {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_where = true;
    }
}

/// `ORDER BY` from whitelisted columns, always ending with `tiebreak` so
/// that pages are stable.
pub(crate) fn push_ordering<S: SortField>(
    builder: &mut QueryBuilder<'_, Postgres>,
    keys: &[SortKey<S>],
    tiebreak: &str,
) {
    builder.push(" ORDER BY ");
    for key in keys {
        builder.push(key.field.column());
        builder.push(" ");
        builder.push(key.direction.as_sql());
        builder.push(" ");
        builder.push(key.direction.nulls_sql());
        builder.push(", ");
    }
    builder.push(tiebreak);
}

pub(crate) fn push_page(builder: &mut QueryBuilder<'_, Postgres>, page: &PageRequest) {
    builder.push(" LIMIT ");
    builder.push_bind(i64::from(page.page_size()));
    builder.push(" OFFSET ");
    builder.push_bind(i64::try_from(page.offset()).unwrap_or(i64::MAX));
}

pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
