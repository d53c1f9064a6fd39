use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub image_model: String,
    pub chat_model: String,
    pub aspect_ratio: String,
    pub image_size: String,
    pub chat_temperature: f32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_model: "gemini-3-pro-image-preview".to_string(),
            chat_model: "gemini-3-pro-preview".to_string(),
            aspect_ratio: "1:1".to_string(),
            image_size: "1K".to_string(),
            chat_temperature: 0.7,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl ProviderSettings {
    /// Defaults overridden by `GEMINI_API_KEY` (or `API_KEY`), `GEMINI_BASE_URL`,
    /// `STUDIO_IMAGE_MODEL` and `STUDIO_CHAT_MODEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            image_model: non_empty("STUDIO_IMAGE_MODEL").unwrap_or(defaults.image_model),
            chat_model: non_empty("STUDIO_CHAT_MODEL").unwrap_or(defaults.chat_model),
            ..defaults
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults_and_skips_blank_values() {
        let env: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "  "),
            ("API_KEY", "secret"),
            ("STUDIO_CHAT_MODEL", "gemini-lite"),
        ]
        .into_iter()
        .collect();
        let settings = ProviderSettings::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.chat_model, "gemini-lite");
        assert_eq!(settings.image_model, "gemini-3-pro-image-preview");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }
}
