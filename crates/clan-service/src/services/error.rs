//! Service layer error types
//!
//! `ServiceError` is the infrastructure failure of a call. Closed battle
//! outcomes travel in the inner `Result<T, XRejection>` instead; front-ends that
//! want a single error type can fold one in with [`ServiceError::rejected`].

use clan_common::AppError;
use clan_core::value_objects::BossTableError;
use clan_core::{DomainError, GuildId, Rejection, RejectionKind};
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    /// Domain or storage failure
    Domain(DomainError),

    /// Auth, validation or configuration failure
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Caller may not touch the resource
    PermissionDenied { reason: String },

    /// Validation error
    Validation(String),

    /// A closed command outcome folded into the error channel
    Rejected {
        kind: RejectionKind,
        code: &'static str,
    },

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::PermissionDenied { reason } => write!(f, "Permission denied: {reason}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Rejected { code, .. } => write!(f, "Rejected: {code}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Fold a rejection into the error channel
    pub fn rejected(rejection: impl Rejection) -> Self {
        Self::Rejected {
            kind: rejection.kind(),
            code: rejection.code(),
        }
    }

    /// HTTP status when surfaced through an API
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::PermissionDenied { .. } => 403,
            Self::Validation(_) => 400,
            Self::Rejected { kind, .. } => match kind {
                RejectionKind::IllegalInput => 400,
                RejectionKind::PreconditionFailed => 409,
                RejectionKind::NotFound => 404,
            },
            Self::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::PermissionDenied { .. } => "PERMISSION_DENIED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Rejected { code, .. } => code,
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<BossTableError> for ServiceError {
    fn from(err: BossTableError) -> Self {
        Self::Domain(DomainError::BossTable(err))
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::PermissionDenied { .. } => AppError::InsufficientPermissions,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Rejected { code, .. } => AppError::InvalidInput(code.to_string()),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Log a rejected command and hand the rejection back
pub(crate) fn reject<T, R: Rejection>(guild_id: GuildId, rejection: R) -> Result<T, R> {
    tracing::warn!(guild_id = %guild_id, code = rejection.code(), "Command rejected");
    Err(rejection)
}
