use actix_web::HttpResponse;
use std::fmt;

/// Error kinds every operation boundary translates into.
/// `DatabaseError` and `Internal` are the server-side kinds; their detail is
/// logged, never returned to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    DatabaseError(String),
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::DatabaseError(_) | AppError::Internal(_) => 500,
        }
    }

    /// Client-facing description. Internal detail collapses to a generic line.
    pub fn description(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg,
            AppError::DatabaseError(_) | AppError::Internal(_) => "Internal server error",
        }
    }

    pub fn to_response(&self) -> HttpResponse {
        match self {
            AppError::DatabaseError(detail) => log::error!("❌ Database error: {}", detail),
            AppError::Internal(detail) => log::error!("❌ Internal error: {}", detail),
            _ => {}
        }

        let body = serde_json::json!({
            "success": false,
            "status_code": self.status_code(),
            "error": self.description(),
        });

        match self {
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(body),
            AppError::Unauthorized(_) => HttpResponse::Unauthorized().json(body),
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(body),
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            AppError::DatabaseError(_) | AppError::Internal(_) => {
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(AppError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(AppError::NotFound("x".into()).status_code(), 404);
        assert_eq!(AppError::DatabaseError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_database_error_detail_is_not_exposed() {
        let err = AppError::DatabaseError("connection refused at 10.0.0.5:27017".into());
        assert_eq!(err.description(), "Internal server error");
    }

    #[test]
    fn test_client_errors_keep_their_description() {
        let err = AppError::NotFound("Item does not exist".into());
        assert_eq!(err.description(), "Item does not exist");
    }
}
