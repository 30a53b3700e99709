use std::fmt;

use reqwest::blocking::RequestBuilder;
use reqwest::header::AUTHORIZATION;

/// The one `Authorization` header value used for every outgoing call.
#[derive(Clone, PartialEq, Eq)]
pub struct Authorization {
    header_value: String,
}

impl Authorization {
    pub fn bearer(token: &str) -> Self {
        Self {
            header_value: format!("Bearer {token}"),
        }
    }

    pub fn header_value(&self) -> &str {
        &self.header_value
    }

    /// The bare token, without the scheme prefix.
    pub fn token(&self) -> &str {
        self.header_value
            .strip_prefix("Bearer ")
            .unwrap_or(&self.header_value)
    }

    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(AUTHORIZATION, self.header_value.as_str())
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Authorization(Bearer <redacted>)")
    }
}
