/// Configuration for the Google Cloud Translation v2 API.
#[derive(Debug, Clone)]
pub struct GoogleSettings {
    /// Registry ID of this provider instance.
    pub id: String,

    /// API base URL.
    pub base_url: String,

    /// Google API key.
    pub api_key: String,
}

impl GoogleSettings {
    pub fn new(id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            base_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
            api_key: api_key.into(),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
