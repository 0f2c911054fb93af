use std::collections::HashMap;

/// Configuration for an OpenAI-compatible provider instance.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleSettings {
    /// Registry ID of this provider instance (e.g., "openai", "my-gateway").
    pub id: String,

    /// Base URL for API calls (e.g., "<https://api.openai.com/v1>").
    pub base_url: String,

    /// API key. If set, adds an `Authorization: Bearer <key>` header.
    pub api_key: Option<String>,

    /// Default model when a request does not carry one.
    pub model: Option<String>,

    /// Extra headers added to every request, after the auth header.
    pub headers: HashMap<String, String>,

    /// Whether the backend only exposes a streaming transport. Carried as
    /// a capability flag; the engine never branches on it.
    pub stream_only: bool,
}

impl OpenAiCompatibleSettings {
    /// Creates settings for the given registry ID with the OpenAI default
    /// base URL.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: None,
            headers: HashMap::new(),
            stream_only: false,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Adds a single header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Marks the backend as streaming-only.
    pub fn with_stream_only(mut self, stream_only: bool) -> Self {
        self.stream_only = stream_only;
        self
    }
}
