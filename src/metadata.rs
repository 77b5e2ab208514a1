//! Authentication metadata attached to an authenticated request.
//!
//! The canonical shape is a JSON object with an optional `public` member,
//! visible to downstream consumers and safe to log, and an optional `private`
//! member meant for authorization decisions only:
//!
//! ```json
//! {"public": {"dnsNames": ["a.example.com"]}}
//! ```
//!
//! Anything else is rejected by [`AuthenticationMetadata::from_raw`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The value produced by the metadata expression is not valid metadata.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    /// The value is not a JSON object.
    #[error("metadata must be an object, got {0}")]
    NotAnObject(String),

    /// The object has a member other than `public` / `private`.
    #[error("unknown metadata field {0:?}")]
    UnknownField(String),
}

/// Identity and authorization data of an authenticated client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthenticationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    public: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    private: Option<Value>,
}

impl AuthenticationMetadata {
    /// Metadata carrying only a public part.
    #[must_use]
    pub fn with_public(public: Value) -> Self {
        Self {
            public: Some(public),
            private: None,
        }
    }

    /// Validate and wrap a raw value.
    ///
    /// A `null` member counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] if `raw` is not an object or has members
    /// other than `public` and `private`.
    pub fn from_raw(raw: Value) -> Result<Self, MetadataError> {
        let mut fields = match raw {
            Value::Object(fields) => fields,
            other => return Err(MetadataError::NotAnObject(other.to_string())),
        };

        let public = take_non_null(&mut fields, "public");
        let private = take_non_null(&mut fields, "private");
        if let Some(unknown) = fields.keys().next() {
            return Err(MetadataError::UnknownField(unknown.clone()));
        }

        Ok(Self { public, private })
    }

    /// The public part, if any.
    #[must_use]
    pub fn public(&self) -> Option<&Value> {
        self.public.as_ref()
    }

    /// The private part, if any.
    #[must_use]
    pub fn private(&self) -> Option<&Value> {
        self.private.as_ref()
    }

    /// Look up a value by key path, starting at the top-level object.
    ///
    /// ```
    /// use tls_client_auth::AuthenticationMetadata;
    ///
    /// let md = AuthenticationMetadata::from_raw(serde_json::json!({
    ///     "public": {"user": {"name": "alice"}}
    /// })).unwrap();
    /// assert_eq!(md.lookup(&["public", "user", "name"]).unwrap(), "alice");
    /// ```
    #[must_use]
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let root = match *first {
            "public" => self.public.as_ref()?,
            "private" => self.private.as_ref()?,
            _ => return None,
        };
        rest.iter().try_fold(root, |value, key| value.get(*key))
    }

    /// Canonical JSON form, containing only the members that are present.
    #[must_use]
    pub fn raw(&self) -> Value {
        let mut fields = Map::new();
        if let Some(public) = &self.public {
            fields.insert("public".to_string(), public.clone());
        }
        if let Some(private) = &self.private {
            fields.insert("private".to_string(), private.clone());
        }
        Value::Object(fields)
    }

    /// `true` when neither part is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.public.is_none() && self.private.is_none()
    }
}

fn take_non_null(fields: &mut Map<String, Value>, key: &str) -> Option<Value> {
    fields.remove(key).filter(|v| !v.is_null())
}
