/// Environment-driven settings, read once at startup. There is no runtime
/// rotation; changing a value means restarting the process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the task backend.
    pub api_url: String,
    /// Base URL of the inference host used for translations.
    pub hf_api_url: String,
    /// Bearer token for the inference host. May be empty, in which case
    /// every translation request fails and falls back to the original text.
    pub hf_api_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url = std::env::var("LINGODO_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        let hf_api_url = std::env::var("LINGODO_HF_API_URL")
            .unwrap_or_else(|_| "https://api-inference.huggingface.co".to_string());
        let hf_api_key = std::env::var("HF_API_KEY").unwrap_or_default();
        if hf_api_key.is_empty() {
            log::warn!("HF_API_KEY is not set; translations will return the original text");
        }
        Config {
            api_url,
            hf_api_url,
            hf_api_key,
        }
    }
}
