// src/domain/audit/entity.rs
use crate::domain::errors::DomainError;
use crate::domain::query::{SearchTerm, SortField, Sortable};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEvent {
    SignIn,
    SignInFailed,
    SignOut,
    PasswordChanged,
    AccountCreated,
    AccountDeleted,
    TokenIssued,
    ConfigurationChange,
}

impl AuditEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEvent::SignIn => "sign_in",
            AuditEvent::SignInFailed => "sign_in_failed",
            AuditEvent::SignOut => "sign_out",
            AuditEvent::PasswordChanged => "password_changed",
            AuditEvent::AccountCreated => "account_created",
            AuditEvent::AccountDeleted => "account_deleted",
            AuditEvent::TokenIssued => "token_issued",
            AuditEvent::ConfigurationChange => "configuration_change",
        }
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditEvent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sign_in" => Ok(AuditEvent::SignIn),
            "sign_in_failed" => Ok(AuditEvent::SignInFailed),
            "sign_out" => Ok(AuditEvent::SignOut),
            "password_changed" => Ok(AuditEvent::PasswordChanged),
            "account_created" => Ok(AuditEvent::AccountCreated),
            "account_deleted" => Ok(AuditEvent::AccountDeleted),
            "token_issued" => Ok(AuditEvent::TokenIssued),
            "configuration_change" => Ok(AuditEvent::ConfigurationChange),
            other => Err(DomainError::validation(
                "event",
                format!("unknown audit event: {other}"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResult {
    Success,
    Fail,
}

impl AuditResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditResult::Success => "success",
            AuditResult::Fail => "fail",
        }
    }

    pub fn from_outcome(succeeded: bool) -> Self {
        if succeeded {
            AuditResult::Success
        } else {
            AuditResult::Fail
        }
    }
}

impl fmt::Display for AuditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditResult {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(AuditResult::Success),
            "fail" => Ok(AuditResult::Fail),
            other => Err(DomainError::validation(
                "result",
                format!("unknown audit result: {other}"),
            )),
        }
    }
}

/// Record handed to the repository for appending.
#[derive(Debug, Clone)]
pub struct NewAuditLog {
    pub event: AuditEvent,
    pub result: AuditResult,
    pub client_address: String,
    pub message: Option<String>,
    pub request: Option<String>,
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    pub id: i64,
    pub event: AuditEvent,
    pub result: AuditResult,
    pub client_address: String,
    pub message: Option<String>,
    pub request: Option<String>,
    pub user_id: Option<UserId>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLog {
    pub fn from_new(id: i64, log: NewAuditLog) -> Self {
        Self {
            id,
            event: log.event,
            result: log.result,
            client_address: log.client_address,
            message: log.message,
            request: log.request,
            user_id: log.user_id,
            user_name: log.user_name,
            user_email: log.user_email,
            location: log.location,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditSortField {
    CreatedAt,
    Event,
    Result,
    ClientAddress,
    UserName,
}

impl SortField for AuditSortField {
    fn column(&self) -> &'static str {
        match self {
            AuditSortField::CreatedAt => "created_at",
            AuditSortField::Event => "event",
            AuditSortField::Result => "result",
            AuditSortField::ClientAddress => "client_address",
            AuditSortField::UserName => "user_name",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "created_at" | "createdat" | "time" | "timestamp" => Some(AuditSortField::CreatedAt),
            "event" => Some(AuditSortField::Event),
            "result" => Some(AuditSortField::Result),
            "client_address" | "clientaddress" | "ip" => Some(AuditSortField::ClientAddress),
            "user_name" | "username" | "user" => Some(AuditSortField::UserName),
            _ => None,
        }
    }
}

impl Sortable<AuditSortField> for AuditLog {
    fn compare_by(&self, other: &Self, field: AuditSortField) -> Ordering {
        match field {
            AuditSortField::CreatedAt => self.created_at.cmp(&other.created_at),
            AuditSortField::Event => self.event.as_str().cmp(other.event.as_str()),
            AuditSortField::Result => self.result.as_str().cmp(other.result.as_str()),
            AuditSortField::ClientAddress => self.client_address.cmp(&other.client_address),
            AuditSortField::UserName => self.user_name.cmp(&other.user_name),
        }
    }
}

/// Free text is OR-ed across user name, email, message, request and client
/// address. Event and result sets are each OR-ed internally and AND-ed with
/// each other; an empty set places no restriction.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub search: Option<SearchTerm>,
    pub events: Vec<AuditEvent>,
    pub results: Vec<AuditResult>,
}

impl AuditLogFilter {
    pub fn matches(&self, log: &AuditLog) -> bool {
        if !self.events.is_empty() && !self.events.contains(&log.event) {
            return false;
        }
        if !self.results.is_empty() && !self.results.contains(&log.result) {
            return false;
        }
        match &self.search {
            Some(term) => term.matches_any([
                log.user_name.as_deref(),
                log.user_email.as_deref(),
                log.message.as_deref(),
                log.request.as_deref(),
                Some(log.client_address.as_str()),
            ]),
            None => true,
        }
    }
}
