// src/infrastructure/repositories/postgres_organization.rs
use super::{cancellable, count_to_u64, map_sqlx, push_condition, push_ordering, push_page};
use crate::domain::entity::{AuditStamp, Change, ChangeSet, EntityStore};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::group::GroupId;
use crate::domain::organization::{
    Address, Organization, OrganizationFilter, OrganizationGroup, OrganizationId,
    OrganizationName, OrganizationRepository, OrganizationSlug, OrganizationSortField,
    OrganizationSummary,
};
use crate::domain::query::{PageQuery, PagedSource};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const ORGANIZATION_COLUMNS: &str = "id, slug, name, address_line1, address_line2, city, region, \
     postal_code, country, owner_id, active, created_at, updated_at, updated_by";

const SUMMARY_SELECT: &str = "SELECT o.id, o.slug, o.name, o.city, o.country, o.owner_id, o.active, \
     o.created_at, (SELECT COUNT(*) FROM groups g WHERE g.organization_id = o.id) AS group_count \
     FROM organizations o";

const SEARCH_COLUMNS: [&str; 4] = ["o.name", "o.slug", "o.city", "o.country"];

#[derive(Clone)]
pub struct PostgresOrganizationRepository {
    pool: PgPool,
}

impl PostgresOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrganizationRow {
    id: Uuid,
    slug: String,
    name: String,
    address_line1: Option<String>,
    address_line2: Option<String>,
    city: Option<String>,
    region: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    owner_id: Option<Uuid>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct OrganizationGroupRow {
    id: Uuid,
    name: String,
    active: bool,
}

#[derive(Debug, FromRow)]
struct OrganizationSummaryRow {
    id: Uuid,
    slug: String,
    name: String,
    city: Option<String>,
    country: Option<String>,
    owner_id: Option<Uuid>,
    active: bool,
    created_at: DateTime<Utc>,
    group_count: i64,
}

impl OrganizationRow {
    fn into_organization(self, groups: Vec<OrganizationGroupRow>) -> DomainResult<Organization> {
        Ok(Organization {
            id: OrganizationId::new(self.id),
            slug: OrganizationSlug::new(self.slug)?,
            name: OrganizationName::new(self.name)?,
            address: Address {
                line1: self.address_line1,
                line2: self.address_line2,
                city: self.city,
                region: self.region,
                postal_code: self.postal_code,
                country: self.country,
            },
            owner_id: self.owner_id.map(UserId::new).transpose()?,
            groups: groups
                .into_iter()
                .map(|row| OrganizationGroup {
                    id: GroupId::new(row.id),
                    name: row.name,
                    active: row.active,
                })
                .collect(),
            active: self.active,
            stamp: AuditStamp {
                created_at: self.created_at,
                updated_at: self.updated_at,
                updated_by: self.updated_by.map(UserId::new).transpose()?,
            },
        })
    }
}

impl TryFrom<OrganizationSummaryRow> for OrganizationSummary {
    type Error = DomainError;

    fn try_from(row: OrganizationSummaryRow) -> Result<Self, Self::Error> {
        Ok(OrganizationSummary {
            id: OrganizationId::new(row.id),
            slug: row.slug,
            name: row.name,
            city: row.city,
            country: row.country,
            owner_id: row.owner_id.map(UserId::new).transpose()?,
            active: row.active,
            group_count: row.group_count,
            created_at: row.created_at,
        })
    }
}

impl PostgresOrganizationRepository {
    fn apply_conditions(builder: &mut QueryBuilder<'_, Postgres>, filter: &OrganizationFilter) {
        let mut has_where = false;
        if filter.active_only {
            push_condition(builder, &mut has_where);
            builder.push("o.active = TRUE");
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

    fn slice_query(
        query: &PageQuery<OrganizationFilter, OrganizationSortField>,
    ) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(SUMMARY_SELECT);
        Self::apply_conditions(&mut builder, &query.filter);
        push_ordering(&mut builder, &query.sort, "o.id");
        push_page(&mut builder, &query.page);
        builder
    }

    fn count_query(filter: &OrganizationFilter) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM organizations o");
        Self::apply_conditions(&mut builder, filter);
        builder
    }

    async fn load(&self, row: Option<OrganizationRow>) -> DomainResult<Option<Organization>> {
        let Some(row) = row else {
            return Ok(None);
        };

        let groups = sqlx::query_as::<_, OrganizationGroupRow>(
            "SELECT id, name, active FROM groups WHERE organization_id = $1 ORDER BY name, id",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.into_organization(groups).map(Some)
    }

    async fn insert_organization(conn: &mut PgConnection, org: &Organization) -> DomainResult<u64> {
        Ok(sqlx::query(
            "INSERT INTO organizations (id, slug, name, address_line1, address_line2, city, region,
                                        postal_code, country, owner_id, active, created_at, updated_at, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(org.id.as_uuid())
        .bind(org.slug.as_str())
        .bind(org.name.as_str())
        .bind(org.address.line1.as_deref())
        .bind(org.address.line2.as_deref())
        .bind(org.address.city.as_deref())
        .bind(org.address.region.as_deref())
        .bind(org.address.postal_code.as_deref())
        .bind(org.address.country.as_deref())
        .bind(org.owner_id.map(Uuid::from))
        .bind(org.active)
        .bind(org.stamp.created_at)
        .bind(org.stamp.updated_at)
        .bind(org.stamp.updated_by.map(Uuid::from))
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?
        .rows_affected())
    }

    async fn update_organization(conn: &mut PgConnection, org: &Organization) -> DomainResult<u64> {
        Ok(sqlx::query(
            "UPDATE organizations
             SET slug = $2, name = $3, address_line1 = $4, address_line2 = $5, city = $6, region = $7,
                 postal_code = $8, country = $9, owner_id = $10, active = $11,
                 updated_at = $12, updated_by = $13
             WHERE id = $1",
        )
        .bind(org.id.as_uuid())
        .bind(org.slug.as_str())
        .bind(org.name.as_str())
        .bind(org.address.line1.as_deref())
        .bind(org.address.line2.as_deref())
        .bind(org.address.city.as_deref())
        .bind(org.address.region.as_deref())
        .bind(org.address.postal_code.as_deref())
        .bind(org.address.country.as_deref())
        .bind(org.owner_id.map(Uuid::from))
        .bind(org.active)
        .bind(org.stamp.updated_at)
        .bind(org.stamp.updated_by.map(Uuid::from))
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?
        .rows_affected())
    }

    /// Child groups and memberships go with it through `ON DELETE CASCADE`.
    async fn delete_organization(conn: &mut PgConnection, id: OrganizationId) -> DomainResult<u64> {
        Ok(sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?
            .rows_affected())
    }
}

#[async_trait]
impl EntityStore<Organization> for PostgresOrganizationRepository {
    async fn find(
        &self,
        id: OrganizationId,
        cancel: &CancellationToken,
    ) -> DomainResult<Option<Organization>> {
        cancellable(cancel, async {
            let row = sqlx::query_as::<_, OrganizationRow>(&format!(
                "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1"
            ))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

            self.load(row).await
        })
        .await
    }

    async fn commit(
        &self,
        changes: ChangeSet<Organization>,
        cancel: &CancellationToken,
    ) -> DomainResult<u64> {
        cancellable(cancel, async {
            let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
            let mut affected = 0;
            for change in changes {
                affected += match change {
                    Change::Add(org) => Self::insert_organization(&mut tx, &org).await?,
                    Change::Update(org) => Self::update_organization(&mut tx, &org).await?,
                    Change::Remove(id) => Self::delete_organization(&mut tx, id).await?,
                };
            }
            tx.commit().await.map_err(map_sqlx)?;
            Ok(affected)
        })
        .await
    }
}

#[async_trait]
impl PagedSource<OrganizationFilter, OrganizationSortField, OrganizationSummary>
    for PostgresOrganizationRepository
{
    async fn fetch_slice(
        &self,
        query: &PageQuery<OrganizationFilter, OrganizationSortField>,
        cancel: &CancellationToken,
    ) -> DomainResult<Vec<OrganizationSummary>> {
        cancellable(cancel, async {
            let mut builder = Self::slice_query(query);
            builder
                .build_query_as::<OrganizationSummaryRow>()
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?
                .into_iter()
                .map(OrganizationSummary::try_from)
                .collect()
        })
        .await
    }

    async fn count_matching(
        &self,
        filter: &OrganizationFilter,
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
impl OrganizationRepository for PostgresOrganizationRepository {
    async fn find_by_slug(
        &self,
        slug: &OrganizationSlug,
        cancel: &CancellationToken,
    ) -> DomainResult<Option<Organization>> {
        cancellable(cancel, async {
            let row = sqlx::query_as::<_, OrganizationRow>(&format!(
                "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE slug = $1"
            ))
            .bind(slug.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

            self.load(row).await
        })
        .await
    }
}
