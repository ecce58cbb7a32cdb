use std::any::Any;
use std::collections::HashMap;

/// Opaque view of one unit of work handed to every detection strategy.
///
/// Strategies narrow the context to the concrete shape they understand via
/// `as_any` and treat a failed downcast as "not applicable". This keeps the
/// resolver independent of any particular host framework.
pub trait WorkContext: Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

/// Standard HTTP-shaped work context.
///
/// Header, claim, and session keys are stored lowercase; lookups normalize
/// the requested key the same way.
#[derive(Debug, Clone, Default)]
pub struct HttpWorkContext {
    pub host: Option<String>,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub claims: HashMap<String, String>,
    pub session: HashMap<String, String>,
}

impl WorkContext for HttpWorkContext {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl HttpWorkContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_claim(mut self, name: &str, value: impl Into<String>) -> Self {
        self.claims.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_session_value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.session.insert(key.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn session_value(&self, key: &str) -> Option<&str> {
        self.session
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// First non-empty segment of the request path.
    pub fn first_path_segment(&self) -> Option<&str> {
        self.path.split('/').find(|segment| !segment.is_empty())
    }
}
