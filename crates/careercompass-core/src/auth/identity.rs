use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Length of a generated identity id.
const ID_LENGTH: usize = 13;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Which side of the platform a user is on. Fixed for the life of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum UserKind {
    Student,
    Institution,
}

impl UserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserKind::Student => "student",
            UserKind::Institution => "institution",
        }
    }

    /// Capitalized label for headings ("Student Login").
    pub fn title(&self) -> &'static str {
        match self {
            UserKind::Student => "Student",
            UserKind::Institution => "Institution",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            UserKind::Student => UserKind::Institution,
            UserKind::Institution => UserKind::Student,
        }
    }
}

impl fmt::Display for UserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in user.
///
/// Persisted as `{"id", "name", "email", "type"}`. Every field is required, so
/// a stored value either deserializes into a complete identity or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export, rename = "User"))]
pub struct Identity {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: UserKind,
}

impl Identity {
    /// Build an identity with a freshly generated id.
    pub fn new(display_name: impl Into<String>, email: impl Into<String>, kind: UserKind) -> Self {
        Self {
            id: generate_id(),
            display_name: display_name.into(),
            email: email.into(),
            kind,
        }
    }

    /// Build an identity whose display name is the email's local part.
    pub fn from_email(email: &str, kind: UserKind) -> Self {
        Self::new(display_name_from_email(email), email, kind)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Everything before the first `@`, or the whole string when there is none.
pub fn display_name_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Opaque lowercase base-36 id.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_from_email() {
        assert_eq!(display_name_from_email("alice@example.com"), "alice");
        assert_eq!(display_name_from_email("a.b+c@x.org"), "a.b+c");
        assert_eq!(display_name_from_email("no-at-sign"), "no-at-sign");
        assert_eq!(display_name_from_email("@host"), "");
    }

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_identity_wire_format() {
        let identity = Identity {
            id: "abc123".to_string(),
            display_name: "Acme University".to_string(),
            email: "a@b.com".to_string(),
            kind: UserKind::Institution,
        };
        let value: serde_json::Value = serde_json::from_str(&identity.to_json().unwrap()).unwrap();
        assert_eq!(value["id"], "abc123");
        assert_eq!(value["name"], "Acme University");
        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["type"], "institution");
    }

    #[test]
    fn test_identity_rejects_partial_record() {
        assert!(Identity::from_json(r#"{"id":"x","name":"n","email":"e"}"#).is_err());
        assert!(Identity::from_json(r#"{"id":"x","name":"n","email":"e","type":null}"#).is_err());
        assert!(Identity::from_json(r#"{"id":"x","name":"n","email":"e","type":"admin"}"#).is_err());
        assert!(Identity::from_json("not json").is_err());
    }

    #[test]
    fn test_user_kind_other() {
        assert_eq!(UserKind::Student.other(), UserKind::Institution);
        assert_eq!(UserKind::Institution.other(), UserKind::Student);
        assert_eq!(UserKind::Institution.to_string(), "institution");
    }
}
