use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::Language;

#[derive(Serialize)]
struct TranslationRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct TranslationEntry {
    translation_text: String,
}

/// Best-effort translation: any failure hands the original text back, so
/// a translation can never block viewing a task.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, lang: Language) -> String;
}

/// Client for the Hugging Face inference API. The model is picked per
/// target language from the opus-mt en-x pairs.
pub struct HfTranslator {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HfTranslator {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        HfTranslator {
            client: Client::new(),
            api_url,
            api_key: api_key.into(),
        }
    }

    async fn request(&self, text: &str, lang: Language) -> Result<String> {
        let url = format!("{}/models/{}", self.api_url, lang.model_id());
        let body = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&TranslationRequest { inputs: text })
            .send()
            .await
            .context("Failed to reach inference host")?
            .error_for_status()
            .context("Translation request rejected")?
            .text()
            .await
            .context("Failed to read translation response")?;
        parse_translation(&body).context("Response carried no translation")
    }
}

/// The first entry's translation_text, if the body is the expected array.
/// Error payloads are JSON objects and fail the array parse.
fn parse_translation(body: &str) -> Option<String> {
    let entries: Vec<TranslationEntry> = serde_json::from_str(body).ok()?;
    entries.into_iter().next().map(|e| e.translation_text)
}

#[async_trait]
impl Translator for HfTranslator {
    async fn translate(&self, text: &str, lang: Language) -> String {
        match self.request(text, lang).await {
            Ok(translated) => translated,
            Err(err) => {
                log::warn!(
                    "Translation to {} failed, keeping original: {:#}",
                    lang.code(),
                    err
                );
                text.to_string()
            }
        }
    }
}
