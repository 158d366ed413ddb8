use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

// SQLite extended result codes
const SQLITE_MISMATCH: &str = "20";
const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
const SQLITE_CONSTRAINT_NOTNULL: &str = "1299";
const SQLITE_CONSTRAINT_DATATYPE: &str = "3091";

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Malformed identifier, parameter outside its whitelist/range, or a
    /// missing required field.
    #[error("{0}")]
    BadRequest(&'static str),
    /// Well-formed request that refers to something that does not exist.
    #[error("{0}")]
    NotFound(&'static str),
    #[error("server error: {0}")]
    ServerError(String),
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl RequestError {
    pub fn bad_request() -> Self {
        Self::BadRequest("Bad request")
    }

    pub fn not_found() -> Self {
        Self::NotFound("Not found")
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorMessage {
    pub msg: String,
}

impl ErrorMessage {
    pub fn new(msg: &str) -> ErrorMessage {
        ErrorMessage {
            msg: msg.to_string(),
        }
    }
}

type Resolution = JsonResponse<ErrorMessage>;

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    /// Runs the error through the handler chain. The first handler that
    /// recognises the error decides the response.
    pub fn to_json_response(self) -> Resolution {
        storage_error_handler(self)
            .or_else(custom_error_handler)
            .unwrap_or_else(server_error_handler)
    }
}

/// Classifies constraint and type failures reported by SQLite.
fn storage_error_handler(error: RequestError) -> Result<Resolution, RequestError> {
    let code = match &error {
        RequestError::DatabaseError(sqlx::Error::Database(db_error)) => {
            db_error.code().map(|code| code.into_owned())
        }
        _ => None,
    };
    let resolution = match code.as_deref() {
        Some(
            SQLITE_MISMATCH
            | SQLITE_CONSTRAINT_CHECK
            | SQLITE_CONSTRAINT_NOTNULL
            | SQLITE_CONSTRAINT_DATATYPE,
        ) => (StatusCode::BAD_REQUEST, "Bad request"),
        Some(SQLITE_CONSTRAINT_FOREIGNKEY) => (StatusCode::NOT_FOUND, "Not found"),
        _ => return Err(error),
    };
    tracing::debug!(%error, status = %resolution.0, "storage error classified");
    Ok((resolution.0, Json(ErrorMessage::new(resolution.1))))
}

fn custom_error_handler(error: RequestError) -> Result<Resolution, RequestError> {
    let (status_code, message) = match error {
        RequestError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        RequestError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        other => return Err(other),
    };
    tracing::debug!(status = %status_code, reason = message, "request rejected");
    Ok((status_code, Json(ErrorMessage::new(message))))
}

fn server_error_handler(error: RequestError) -> Resolution {
    tracing::error!(error = ?error, "unhandled error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorMessage::new("Internal Server Error")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_keep_their_status_and_message() {
        let (status, Json(body)) = RequestError::not_found().to_json_response();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.msg, "Not found");

        let (status, Json(body)) = RequestError::BadRequest("Missing field").to_json_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.msg, "Missing field");
    }

    #[test]
    fn unclassified_errors_become_a_generic_500() {
        let (status, Json(body)) =
            RequestError::ServerError("connection reset by peer".into()).to_json_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.msg, "Internal Server Error");

        let (status, Json(body)) =
            RequestError::DatabaseError(sqlx::Error::PoolTimedOut).to_json_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.msg, "Internal Server Error");
    }

    #[test]
    fn row_not_found_is_not_treated_as_a_storage_constraint() {
        let error = RequestError::DatabaseError(sqlx::Error::RowNotFound);
        assert!(storage_error_handler(error).is_err());
    }
}
