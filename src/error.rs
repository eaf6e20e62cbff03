use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Matchmaking rule violations. Each kind is surfaced to the client
    // with its own code so the UI can explain the denial.
    #[error("you cannot send an interest to yourself")]
    SelfInterestForbidden,

    #[error("message text must not be empty")]
    EmptyMessage,

    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    #[error("interest not found: {0}")]
    InterestNotFound(Uuid),

    #[error("an interest already exists between these two users")]
    InterestAlreadyExists,

    #[error("interest is no longer pending")]
    InterestNotPending,

    #[error("conversation is not unlocked for this pair")]
    ConversationNotUnlocked,

    #[error("only the receiver of an interest may accept or reject it")]
    NotAuthorizedToResolve,

    #[error("admin accounts cannot take part in matchmaking")]
    AdminNotAParticipant,

    #[error("free plan interest limit of {cap} reached")]
    InterestQuotaExceeded { cap: u32 },

    #[error("invalid input: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("access denied")]
    Forbidden,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code included in every error response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::SelfInterestForbidden => "SELF_INTEREST_FORBIDDEN",
            AppError::EmptyMessage => "EMPTY_MESSAGE",
            AppError::UserNotFound(_) => "USER_NOT_FOUND",
            AppError::InterestNotFound(_) => "INTEREST_NOT_FOUND",
            AppError::InterestAlreadyExists => "INTEREST_ALREADY_EXISTS",
            AppError::InterestNotPending => "INTEREST_NOT_PENDING",
            AppError::ConversationNotUnlocked => "CONVERSATION_NOT_UNLOCKED",
            AppError::NotAuthorizedToResolve => "NOT_AUTHORIZED_TO_RESOLVE",
            AppError::AdminNotAParticipant => "ADMIN_NOT_A_PARTICIPANT",
            AppError::InterestQuotaExceeded { .. } => "INTEREST_QUOTA_EXCEEDED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SelfInterestForbidden
            | AppError::EmptyMessage
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            // Quota exhaustion is resolved by upgrading the plan.
            AppError::InterestQuotaExceeded { .. } => StatusCode::PAYMENT_REQUIRED,
            AppError::NotAuthorizedToResolve
            | AppError::AdminNotAParticipant
            | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound(_)
            | AppError::InterestNotFound(_)
            | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InterestAlreadyExists
            | AppError::InterestNotPending
            | AppError::ConversationNotUnlocked
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("database error: {:?}", e);
                "Database error occurred".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("internal error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Config(e) => {
                tracing::error!("configuration error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_client_status_codes() {
        assert_eq!(
            AppError::SelfInterestForbidden.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InterestQuotaExceeded { cap: 2 }.status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            AppError::NotAuthorizedToResolve.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::InterestAlreadyExists.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::UserNotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn every_kind_has_a_distinct_code() {
        let codes = [
            AppError::SelfInterestForbidden.code(),
            AppError::EmptyMessage.code(),
            AppError::UserNotFound(Uuid::nil()).code(),
            AppError::InterestNotFound(Uuid::nil()).code(),
            AppError::InterestAlreadyExists.code(),
            AppError::InterestNotPending.code(),
            AppError::ConversationNotUnlocked.code(),
            AppError::NotAuthorizedToResolve.code(),
            AppError::AdminNotAParticipant.code(),
            AppError::InterestQuotaExceeded { cap: 2 }.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
