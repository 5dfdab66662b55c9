// src/application/error.rs
use crate::domain::errors::{DomainError, DomainResult};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ErrorSink>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of an entity validator; empty means the entity is acceptable.
pub type ValidationErrors = Vec<FieldError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Critical(String),
}

/// Errors accumulated during one service call.
///
/// A sink is created by the call that needs it and handed back to the
/// caller as the `Err` side of [`ServiceResult`]; it is never shared
/// between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summarize(.errors))]
pub struct ErrorSink {
    errors: Vec<ServiceError>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validation(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors.push(ServiceError::Validation {
            field: field.into(),
            message: message.into(),
        });
        self
    }

    pub fn critical(&mut self, message: impl Into<String>) -> &mut Self {
        self.errors.push(ServiceError::Critical(message.into()));
        self
    }

    pub fn critical_not_found(&mut self, message: impl Into<String>) -> &mut Self {
        self.errors.push(ServiceError::NotFound(message.into()));
        self
    }

    pub fn extend_validation(&mut self, errors: ValidationErrors) -> &mut Self {
        for FieldError { field, message } in errors {
            self.validation(field, message);
        }
        self
    }

    pub fn record(&mut self, err: DomainError) -> &mut Self {
        match err {
            DomainError::Validation { field, message } => self.validation(field, message),
            DomainError::NotFound(message) => self.critical_not_found(message),
            other => self.critical(other.to_string()),
        }
    }

    /// Keeps the value on success, records the error otherwise.
    pub fn capture<T>(&mut self, result: DomainResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ServiceError] {
        &self.errors
    }

    pub fn is_not_found(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, ServiceError::NotFound(_)))
    }

    pub fn has_validation_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, ServiceError::Validation { .. }))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        let mut sink = Self::new();
        sink.critical_not_found(message);
        sink
    }
}

impl From<DomainError> for ErrorSink {
    fn from(err: DomainError) -> Self {
        let mut sink = Self::new();
        sink.record(err);
        sink
    }
}

fn summarize(errors: &[ServiceError]) -> String {
    if errors.is_empty() {
        return "no errors".into();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
