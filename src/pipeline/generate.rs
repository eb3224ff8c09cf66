//! Compliment generation backends.
//!
//! Both backends make a single attempt per run. Failures come back as
//! [`GenerationError`]; the orchestrator turns them into the fallback
//! compliment, so nothing here decides what the user finally sees.
//!
//! * [`ComplimentService`]: the hosted JSON endpoint:
//!   `POST {"text": …}` → `{"message": …}`. A 2xx answer without a usable
//!   `message` yields the configured empty-response compliment.
//! * [`LlmComplimentGenerator`]: an `edgequake-llm` provider prompted with
//!   [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].

use crate::config::{GeneratorBackend, PipelineConfig};
use crate::error::GenerationError;
use crate::prompts::{user_prompt, DEFAULT_SYSTEM_PROMPT};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Produces a compliment from the assembled document text.
#[async_trait]
pub trait ComplimentGenerator: Send + Sync {
    async fn generate(&self, document_text: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Serialize)]
struct ComplimentRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ComplimentResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the JSON compliment endpoint.
#[derive(Debug, Clone)]
pub struct ComplimentService {
    client: reqwest::Client,
    endpoint: String,
    empty_response: String,
    timeout_secs: Option<u64>,
}

impl ComplimentService {
    pub fn new(
        endpoint: impl Into<String>,
        empty_response: impl Into<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, GenerationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| GenerationError::Transport {
            detail: e.to_string(),
        })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            empty_response: empty_response.into(),
            timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_send_error(&self, e: reqwest::Error) -> GenerationError {
        match self.timeout_secs {
            Some(secs) if e.is_timeout() => GenerationError::Timeout { secs },
            _ => GenerationError::Transport {
                detail: e.to_string(),
            },
        }
    }
}

#[async_trait]
impl ComplimentGenerator for ComplimentService {
    async fn generate(&self, document_text: &str) -> Result<String, GenerationError> {
        debug!(
            "POST {} ({} chars of document text)",
            self.endpoint,
            document_text.chars().count()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ComplimentRequest {
                text: document_text,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ComplimentResponse =
            serde_json::from_str(&body).map_err(|e| GenerationError::MalformedBody {
                detail: e.to_string(),
            })?;

        match parsed.message {
            Some(message) if !message.is_empty() => Ok(message),
            _ => {
                info!("Compliment service answered without a message; using default");
                Ok(self.empty_response.clone())
            }
        }
    }
}

/// Generates the compliment with an LLM provider.
pub struct LlmComplimentGenerator {
    provider: Arc<dyn LLMProvider>,
    system_prompt: String,
    options: CompletionOptions,
    timeout_secs: Option<u64>,
}

impl LlmComplimentGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &PipelineConfig) -> Self {
        Self {
            provider,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            options: CompletionOptions {
                temperature: Some(config.temperature),
                max_tokens: Some(config.max_tokens),
                ..Default::default()
            },
            timeout_secs: config.request_timeout_secs,
        }
    }
}

#[async_trait]
impl ComplimentGenerator for LlmComplimentGenerator {
    async fn generate(&self, document_text: &str) -> Result<String, GenerationError> {
        let messages = vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(user_prompt(document_text)),
        ];

        let call = self.provider.chat(&messages, Some(&self.options));
        let result = match self.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), call)
                .await
                .map_err(|_| GenerationError::Timeout { secs })?,
            None => call.await,
        };

        let response = result.map_err(|e| GenerationError::Provider {
            message: e.to_string(),
        })?;
        debug!(
            "LLM compliment: {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );

        let text = response.content.trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::Provider {
                message: "provider returned an empty completion".into(),
            });
        }
        Ok(text)
    }
}

/// Build the generator selected by `config.backend`.
pub fn from_config(
    config: &PipelineConfig,
) -> Result<Arc<dyn ComplimentGenerator>, GenerationError> {
    match &config.backend {
        GeneratorBackend::Service { endpoint } => Ok(Arc::new(ComplimentService::new(
            endpoint.clone(),
            config.empty_response_compliment.clone(),
            config.request_timeout_secs,
        )?)),
        GeneratorBackend::Llm {
            provider_name,
            model,
        } => {
            let provider = resolve_provider(config, provider_name.as_deref(), model.as_deref())?;
            Ok(Arc::new(LlmComplimentGenerator::new(provider, config)))
        }
    }
}

/// Resolve the LLM provider, from most-specific to least-specific:
///
/// 1. a pre-built provider in `config.provider`
/// 2. a named provider (+ model, default `gpt-4.1-nano`)
/// 3. `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`
/// 4. `ProviderFactory::from_env` auto-detection
fn resolve_provider(
    config: &PipelineConfig,
    provider_name: Option<&str>,
    model: Option<&str>,
) -> Result<Arc<dyn LLMProvider>, GenerationError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(name) = provider_name {
        return create_provider(name, model.unwrap_or("gpt-4.1-nano"));
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| GenerationError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or name a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, GenerationError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        GenerationError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}
