//! Route handlers. Each one is a single lookup or mutation against the
//! shared [`FileStore`] handle followed by a JSON response.

use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::{json, Value};

use crate::auth::{hash_password, issue_token, verify_password};
use crate::errors::ApiError;
use crate::models::{strip_password, LoginRequest, REQUIRED_FIELDS};
use crate::store::{Document, FileStore, StoreError};

/// All stored user documents, password hashes redacted.
#[get("/users")]
pub async fn list_users(store: web::Data<FileStore>) -> Result<HttpResponse, ApiError> {
    let docs: Vec<Document> = store
        .find_all()
        .await
        .into_iter()
        .map(strip_password)
        .collect();
    Ok(HttpResponse::Ok().json(docs))
}

/// Password login. On success the stored token is rotated, the rotation is
/// persisted before the response is sent, and the document comes back with
/// the fresh token and no password hash.
#[post("/authorization")]
pub async fn authorize(
    store: web::Data<FileStore>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let creds = body.into_inner();
    let mut doc = store
        .find_one(&[("username", json!(creds.username))])
        .await
        .ok_or(ApiError::UsernameNotFound)?;

    let stored_hash = doc.get("password").and_then(Value::as_str).unwrap_or("");
    if !verify_password(&creds.password, stored_hash) {
        return Err(ApiError::LoginFailed);
    }

    let token = issue_token();
    let mut set = Document::new();
    set.insert("token".to_string(), json!(token));
    store
        .update_one(&[("username", json!(creds.username))], set)
        .await?;
    tracing::info!(username = %creds.username, "login succeeded, token rotated");

    doc.insert("token".to_string(), json!(token));
    Ok(HttpResponse::Ok().json(strip_password(doc)))
}

/// Register a new user. The whole body is stored as the document, with the
/// password replaced by its salted hash and a fresh token added.
#[post("/users")]
pub async fn register(
    store: web::Data<FileStore>,
    body: web::Json<Document>,
) -> Result<HttpResponse, ApiError> {
    let mut doc = body.into_inner();
    if REQUIRED_FIELDS.iter().any(|field| !doc.contains_key(*field)) {
        return Err(ApiError::MissingFields);
    }

    // A non-string password still registers; it is hashed from its JSON text.
    let plain = match doc.get("password") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => return Err(ApiError::MissingFields),
    };
    doc.insert("password".to_string(), json!(hash_password(&plain)?));
    doc.insert("token".to_string(), json!(issue_token()));

    let inserted = store
        .insert_unique("username", doc)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => ApiError::UsernameExists,
            other => ApiError::Store(other),
        })?;
    tracing::info!(
        username = %inserted.get("username").and_then(serde_json::Value::as_str).unwrap_or(""),
        "user registered"
    );
    Ok(HttpResponse::Ok().json(strip_password(inserted)))
}

/// Partial update, gated on a matching username+token pair. The body is
/// merged field-by-field into the stored document.
#[patch("/users/{username}/{token}")]
pub async fn update_user(
    store: web::Data<FileStore>,
    path: web::Path<(String, String)>,
    body: web::Json<Document>,
) -> Result<HttpResponse, ApiError> {
    let (username, token) = path.into_inner();
    let updated = store
        .update_one(
            &[("username", json!(username)), ("token", json!(token))],
            body.into_inner(),
        )
        .await?;
    if updated == 0 {
        return Err(ApiError::NoMatch);
    }
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// Delete a user record. The match is gated on the token alone; the
/// username path segment is accepted but not part of the filter.
#[delete("/users/{username}/{token}")]
pub async fn delete_user(
    store: web::Data<FileStore>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (_username, token) = path.into_inner();
    let deleted = store.delete_one(&[("token", json!(token))]).await?;
    if deleted == 0 {
        return Err(ApiError::NoMatch);
    }
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// Fallback for any method+path with no registered route.
pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body("Invalid URL.")
}

/// Register every route on an actix `App`, shared by the binary and the
/// test harness.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(authorize)
        .service(register)
        .service(update_user)
        .service(delete_user);
}
