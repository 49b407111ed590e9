use serde::Deserialize;

use crate::store::Document;

/// Fields a registration body must carry. Presence of the key is what is
/// checked, not the truthiness of its value.
pub const REQUIRED_FIELDS: [&str; 4] = ["username", "password", "email", "name"];

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Drop the password hash from a document before it leaves the service.
pub fn strip_password(mut doc: Document) -> Document {
    doc.remove("password");
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strip_password_removes_only_the_hash() {
        let doc = match json!({"username": "ada", "password": "$2b$...", "name": "Ada"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let doc = strip_password(doc);
        assert!(!doc.contains_key("password"));
        assert_eq!(doc.get("username"), Some(&json!("ada")));
        assert_eq!(doc.get("name"), Some(&json!("Ada")));
    }
}
