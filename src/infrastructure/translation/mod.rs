//! Translation Clients
//!
//! `HttpTranslator` talks to a LibreTranslate-compatible endpoint, one request
//! per non-empty field. `DisabledTranslator` stands in when no endpoint is
//! configured.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::TranslationSettings;
use crate::domain::services::{TranslationError, Translator};
use crate::domain::TranslatableFields;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

/// Translator backed by an HTTP translation service.
#[derive(Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    /// Create a translator posting to `endpoint`.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TranslationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }

    async fn translate_text(
        &self,
        text: &str,
        from_locale: &str,
        to_locale: &str,
    ) -> Result<String, TranslationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&TranslateRequest {
                q: text,
                source: from_locale,
                target: to_locale,
                format: "text",
                api_key: self.api_key.as_deref(),
            })
            .send()
            .await
            .map_err(|e| TranslationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::Request(format!(
                "translation service answered {}",
                status
            )));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;
        Ok(body.translated_text)
    }

    async fn translate_optional(
        &self,
        text: Option<&str>,
        from_locale: &str,
        to_locale: &str,
    ) -> Result<Option<String>, TranslationError> {
        match text {
            Some(text) if !text.trim().is_empty() => self
                .translate_text(text, from_locale, to_locale)
                .await
                .map(Some),
            other => Ok(other.map(str::to_owned)),
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        fields: &TranslatableFields,
        from_locale: &str,
        to_locale: &str,
    ) -> Result<TranslatableFields, TranslationError> {
        tracing::debug!(from = from_locale, to = to_locale, "Translating content fields");

        Ok(TranslatableFields {
            title: self.translate_text(&fields.title, from_locale, to_locale).await?,
            excerpt: self
                .translate_optional(fields.excerpt.as_deref(), from_locale, to_locale)
                .await?,
            body: self
                .translate_optional(fields.body.as_deref(), from_locale, to_locale)
                .await?,
            seo_title: self
                .translate_optional(fields.seo_title.as_deref(), from_locale, to_locale)
                .await?,
            seo_description: self
                .translate_optional(fields.seo_description.as_deref(), from_locale, to_locale)
                .await?,
        })
    }
}

/// Translator used when no endpoint is configured. Every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    async fn translate(
        &self,
        _fields: &TranslatableFields,
        _from_locale: &str,
        _to_locale: &str,
    ) -> Result<TranslatableFields, TranslationError> {
        Err(TranslationError::NotConfigured)
    }
}

/// Build the translator described by the settings.
pub fn build_translator(
    settings: &TranslationSettings,
) -> Result<Box<dyn Translator>, TranslationError> {
    match settings.endpoint.as_deref() {
        Some(endpoint) if !endpoint.is_empty() => Ok(Box::new(HttpTranslator::new(
            endpoint,
            settings.api_key.clone(),
            Duration::from_secs(settings.timeout_secs),
        )?)),
        _ => {
            tracing::info!("No translation endpoint configured, auto sync is disabled");
            Ok(Box::new(DisabledTranslator))
        }
    }
}
