use std::fmt;

/// API key and tenant identifier pair handed to the client once
///
/// Both values are opaque: they are never validated or rewritten locally and
/// are forwarded verbatim to the prompt service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    tenant_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            tenant_id: tenant_id.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

fn redact(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();

    if key.chars().count() <= 8 {
        "****".to_string()
    } else {
        format!("{}****", prefix)
    }
}
