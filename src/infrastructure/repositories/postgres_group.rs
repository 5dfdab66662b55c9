// src/infrastructure/repositories/postgres_group.rs
use super::{cancellable, count_to_u64, map_sqlx, push_condition, push_ordering, push_page};
use crate::domain::entity::{AuditStamp, Change, ChangeSet, EntityStore};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::group::{
    Group, GroupFilter, GroupId, GroupName, GroupRepository, GroupSortField, GroupSummary,
    GroupUser,
};
use crate::domain::organization::OrganizationId;
use crate::domain::query::{PageQuery, PagedSource};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const GROUP_COLUMNS: &str = "id, organization_id, parent_id, name, description, owner_id, active, \
     created_at, updated_at, updated_by";

const SUMMARY_SELECT: &str = "SELECT g.id, g.organization_id, g.parent_id, g.name, g.description, \
     g.owner_id, g.active, g.created_at, g.updated_at, \
     (SELECT COUNT(*) FROM group_users gu WHERE gu.group_id = g.id) AS member_count \
     FROM groups g";

#[derive(Clone)]
pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    id: Uuid,
    organization_id: Uuid,
    parent_id: Option<Uuid>,
    name: String,
    description: Option<String>,
    owner_id: Option<Uuid>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct GroupUserRow {
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct GroupSummaryRow {
    id: Uuid,
    organization_id: Uuid,
    parent_id: Option<Uuid>,
    name: String,
    description: Option<String>,
    owner_id: Option<Uuid>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    member_count: i64,
}

fn user_id(raw: Option<Uuid>) -> DomainResult<Option<UserId>> {
    raw.map(UserId::new).transpose()
}

impl GroupRow {
    fn into_group(self, members: Vec<GroupUserRow>) -> DomainResult<Group> {
        let id = GroupId::new(self.id);
        let members = members
            .into_iter()
            .map(|row| {
                Ok(GroupUser {
                    group_id: id,
                    user_id: UserId::new(row.user_id)?,
                    created_at: row.created_at,
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Group {
            id,
            organization_id: OrganizationId::new(self.organization_id),
            parent_id: self.parent_id.map(GroupId::new),
            name: GroupName::new(self.name)?,
            description: self.description,
            owner_id: user_id(self.owner_id)?,
            members,
            members_replaced: false,
            active: self.active,
            stamp: AuditStamp {
                created_at: self.created_at,
                updated_at: self.updated_at,
                updated_by: user_id(self.updated_by)?,
            },
        })
    }
}

impl TryFrom<GroupSummaryRow> for GroupSummary {
    type Error = DomainError;

    fn try_from(row: GroupSummaryRow) -> Result<Self, Self::Error> {
        Ok(GroupSummary {
            id: GroupId::new(row.id),
            organization_id: OrganizationId::new(row.organization_id),
            parent_id: row.parent_id.map(GroupId::new),
            name: row.name,
            description: row.description,
            owner_id: user_id(row.owner_id)?,
            active: row.active,
            member_count: row.member_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PostgresGroupRepository {
    fn apply_conditions(builder: &mut QueryBuilder<'_, Postgres>, filter: &GroupFilter) {
        let mut has_where = false;
        if let Some(organization_id) = filter.organization_id {
            push_condition(builder, &mut has_where);
            builder.push("g.organization_id = ");
            builder.push_bind(organization_id.as_uuid());
        }

        if filter.active_only {
            push_condition(builder, &mut has_where);
            builder.push("g.active = TRUE");
        }

        if let Some(term) = &filter.search {
            let pattern = term.like_pattern();
            push_condition(builder, &mut has_where);
            builder.push("(g.name ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR g.description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }

    fn slice_query(query: &PageQuery<GroupFilter, GroupSortField>) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new(SUMMARY_SELECT);
        Self::apply_conditions(&mut builder, &query.filter);
        push_ordering(&mut builder, &query.sort, "g.id");
        push_page(&mut builder, &query.page);
        builder
    }

    fn count_query(filter: &GroupFilter) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM groups g");
        Self::apply_conditions(&mut builder, filter);
        builder
    }

    async fn insert_group(conn: &mut PgConnection, group: &Group) -> DomainResult<u64> {
        let inserted = sqlx::query(
            "INSERT INTO groups (id, organization_id, parent_id, name, description, owner_id, active, created_at, updated_at, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(group.id.as_uuid())
        .bind(group.organization_id.as_uuid())
        .bind(group.parent_id.map(Uuid::from))
        .bind(group.name.as_str())
        .bind(group.description.as_deref())
        .bind(group.owner_id.map(Uuid::from))
        .bind(group.active)
        .bind(group.stamp.created_at)
        .bind(group.stamp.updated_at)
        .bind(group.stamp.updated_by.map(Uuid::from))
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?
        .rows_affected();

        let members = Self::insert_members(conn, &group.members).await?;
        Ok(inserted + members)
    }

    async fn update_group(conn: &mut PgConnection, group: &Group) -> DomainResult<u64> {
        let updated = sqlx::query(
            "UPDATE groups
             SET parent_id = $2, name = $3, description = $4, owner_id = $5, active = $6,
                 updated_at = $7, updated_by = $8
             WHERE id = $1",
        )
        .bind(group.id.as_uuid())
        .bind(group.parent_id.map(Uuid::from))
        .bind(group.name.as_str())
        .bind(group.description.as_deref())
        .bind(group.owner_id.map(Uuid::from))
        .bind(group.active)
        .bind(group.stamp.updated_at)
        .bind(group.stamp.updated_by.map(Uuid::from))
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?
        .rows_affected();

        if updated == 0 || !group.members_replaced {
            return Ok(updated);
        }

        let removed = sqlx::query("DELETE FROM group_users WHERE group_id = $1")
            .bind(group.id.as_uuid())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?
            .rows_affected();
        let inserted = Self::insert_members(conn, &group.members).await?;
        Ok(updated + removed + inserted)
    }

    async fn insert_members(conn: &mut PgConnection, members: &[GroupUser]) -> DomainResult<u64> {
        if members.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO group_users (group_id, user_id, created_at) ");
        builder.push_values(members, |mut row, member| {
            row.push_bind(member.group_id.as_uuid())
                .push_bind(member.user_id.as_uuid())
                .push_bind(member.created_at);
        });

        Ok(builder
            .build()
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?
            .rows_affected())
    }

    async fn delete_group(conn: &mut PgConnection, id: GroupId) -> DomainResult<u64> {
        Ok(sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?
            .rows_affected())
    }
}

#[async_trait]
impl EntityStore<Group> for PostgresGroupRepository {
    async fn find(&self, id: GroupId, cancel: &CancellationToken) -> DomainResult<Option<Group>> {
        cancellable(cancel, async {
            let row = sqlx::query_as::<_, GroupRow>(&format!(
                "SELECT {GROUP_COLUMNS} FROM groups WHERE id = $1"
            ))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

            let Some(row) = row else {
                return Ok(None);
            };

            let members = sqlx::query_as::<_, GroupUserRow>(
                "SELECT user_id, created_at FROM group_users WHERE group_id = $1 ORDER BY created_at, user_id",
            )
            .bind(id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

            row.into_group(members).map(Some)
        })
        .await
    }

    async fn commit(&self, changes: ChangeSet<Group>, cancel: &CancellationToken) -> DomainResult<u64> {
        cancellable(cancel, async {
            let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
            let mut affected = 0;
            for change in changes {
                affected += match change {
                    Change::Add(group) => Self::insert_group(&mut tx, &group).await?,
                    Change::Update(group) => Self::update_group(&mut tx, &group).await?,
                    Change::Remove(id) => Self::delete_group(&mut tx, id).await?,
                };
            }
            tx.commit().await.map_err(map_sqlx)?;
            Ok(affected)
        })
        .await
    }
}

#[async_trait]
impl PagedSource<GroupFilter, GroupSortField, GroupSummary> for PostgresGroupRepository {
    async fn fetch_slice(
        &self,
        query: &PageQuery<GroupFilter, GroupSortField>,
        cancel: &CancellationToken,
    ) -> DomainResult<Vec<GroupSummary>> {
        cancellable(cancel, async {
            let mut builder = Self::slice_query(query);
            builder
                .build_query_as::<GroupSummaryRow>()
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?
                .into_iter()
                .map(GroupSummary::try_from)
                .collect()
        })
        .await
    }

    async fn count_matching(
        &self,
        filter: &GroupFilter,
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
impl GroupRepository for PostgresGroupRepository {
    async fn name_taken(
        &self,
        organization_id: OrganizationId,
        name: &GroupName,
        exclude: Option<GroupId>,
        cancel: &CancellationToken,
    ) -> DomainResult<bool> {
        cancellable(cancel, async {
            sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (
                     SELECT 1 FROM groups
                     WHERE organization_id = $1 AND name = $2 AND ($3::uuid IS NULL OR id <> $3)
                 )",
            )
            .bind(organization_id.as_uuid())
            .bind(name.as_str())
            .bind(exclude.map(Uuid::from))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
        })
        .await
    }
}
