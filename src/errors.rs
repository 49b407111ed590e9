//! Request-level error taxonomy.
//!
//! Every rejection a handler can produce, tagged so validation failures map
//! to 4xx and store failures to 5xx. All variants serialize to the same
//! `{"error": <message>}` envelope the API has always spoken.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing fields.")]
    MissingFields,
    #[error("Username already exists.")]
    UsernameExists,
    #[error("Username not found.")]
    UsernameNotFound,
    #[error("Login Failed!")]
    LoginFailed,
    #[error("Something went wrong.")]
    NoMatch,
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::UsernameExists => StatusCode::CONFLICT,
            ApiError::UsernameNotFound | ApiError::NoMatch => StatusCode::NOT_FOUND,
            ApiError::LoginFailed => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) | ApiError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_4xx() {
        assert_eq!(ApiError::MissingFields.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UsernameExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::UsernameNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::LoginFailed.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NoMatch.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_errors_map_to_500() {
        let err = ApiError::Store(StoreError::Io(std::io::Error::other("disk gone")));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn envelope_carries_the_message() {
        assert_eq!(ApiError::LoginFailed.to_string(), "Login Failed!");
        assert_eq!(ApiError::NoMatch.to_string(), "Something went wrong.");
    }
}
