// src/infrastructure/repositories/error.rs
use crate::domain::errors::DomainError;

const CNT_ORGANIZATION_SLUG: &str = "organizations_slug_key";
const CNT_GROUP_NAME: &str = "groups_organization_name_key";
const CNT_GROUP_ORGANIZATION: &str = "groups_organization_id_fkey";
const CNT_GROUP_PARENT: &str = "groups_parent_id_fkey";
const CNT_GROUP_USER_GROUP: &str = "group_users_group_id_fkey";
const CNT_GROUP_NOT_OWN_PARENT: &str = "groups_parent_not_self_chk";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::RowNotFound => DomainError::NotFound("record not found".into()),
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_ORGANIZATION_SLUG => {
                        DomainError::Conflict("organization slug already exists".into())
                    }
                    CNT_GROUP_NAME => DomainError::Conflict(
                        "a group with this name already exists in the organization".into(),
                    ),
                    CNT_GROUP_ORGANIZATION => {
                        DomainError::NotFound("organization not found".into())
                    }
                    CNT_GROUP_PARENT => DomainError::NotFound("parent group not found".into()),
                    CNT_GROUP_USER_GROUP => DomainError::NotFound("group not found".into()),
                    CNT_GROUP_NOT_OWN_PARENT => {
                        DomainError::validation("parent_id", "a group cannot be its own parent")
                    }
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    "23514" => {
                        return DomainError::validation("record", "check constraint violated");
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        _ => DomainError::Persistence(err.to_string()),
    }
}
