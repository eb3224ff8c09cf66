//! Configuration for a compliment run.
//!
//! Every knob lives in [`PipelineConfig`], built via
//! [`PipelineConfigBuilder`]. The defaults reproduce the hosted application:
//! the fixed compliment endpoint, no request timeout, a 5 MiB upload cap and
//! the Portuguese fallback messages.

use crate::error::ElogioError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Hosted compliment service.
pub const DEFAULT_ENDPOINT: &str = "https://me-elogie-api.vercel.app/chat";

/// Compliment shown when the backend call fails.
pub const DEFAULT_FALLBACK_COMPLIMENT: &str =
    "Seu currículo mostra seu talento e dedicação. Continue brilhando no que faz!";

/// Compliment shown when the backend answers without a message.
pub const DEFAULT_EMPTY_RESPONSE_COMPLIMENT: &str =
    "Seu currículo é impressionante! Continue assim!";

/// Largest document the intake accepts (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Which backend produces the compliment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorBackend {
    /// POST `{"text": …}` to a JSON endpoint and read `message` back. (default)
    Service { endpoint: String },
    /// Ask an `edgequake-llm` provider directly.
    ///
    /// With both fields `None` the provider is auto-detected from the
    /// environment (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, …).
    Llm {
        provider_name: Option<String>,
        model: Option<String>,
    },
}

impl Default for GeneratorBackend {
    fn default() -> Self {
        GeneratorBackend::Service {
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// Configuration for the résumé → compliment pipeline.
///
/// # Example
/// ```rust
/// use elogio::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .endpoint("http://localhost:8080/chat")
///     .request_timeout_secs(20)
///     .build()
///     .unwrap();
/// assert_eq!(config.request_timeout_secs, Some(20));
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Compliment backend. Default: the hosted service.
    pub backend: GeneratorBackend,

    /// Pre-constructed LLM provider. Takes precedence over the names in
    /// [`GeneratorBackend::Llm`].
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Substituted when generation fails.
    pub fallback_compliment: String,

    /// Used when the service answers 2xx without a `message`.
    pub empty_response_compliment: String,

    /// Optional cap on the generation call. Default: none, the call is
    /// bounded only by the transport.
    pub request_timeout_secs: Option<u64>,

    /// Intake size cap in bytes. Default: 5 MiB.
    pub max_upload_bytes: u64,

    /// Timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Sampling temperature for the LLM backend. Default: 0.7.
    pub temperature: f32,

    /// Maximum tokens for the LLM backend. Default: 512.
    pub max_tokens: usize,

    /// Custom system prompt for the LLM backend.
    pub system_prompt: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            backend: GeneratorBackend::default(),
            provider: None,
            fallback_compliment: DEFAULT_FALLBACK_COMPLIMENT.to_string(),
            empty_response_compliment: DEFAULT_EMPTY_RESPONSE_COMPLIMENT.to_string(),
            request_timeout_secs: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            download_timeout_secs: 120,
            temperature: 0.7,
            max_tokens: 512,
            system_prompt: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("backend", &self.backend)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("fallback_compliment", &self.fallback_compliment)
            .field("empty_response_compliment", &self.empty_response_compliment)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Use the JSON compliment service at `url`.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.backend = GeneratorBackend::Service {
            endpoint: url.into(),
        };
        self
    }

    /// Use an LLM provider instead of the compliment service.
    pub fn llm(mut self, provider_name: Option<String>, model: Option<String>) -> Self {
        self.config.backend = GeneratorBackend::Llm {
            provider_name,
            model,
        };
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        if !matches!(self.config.backend, GeneratorBackend::Llm { .. }) {
            self.config.backend = GeneratorBackend::Llm {
                provider_name: None,
                model: None,
            };
        }
        self
    }

    pub fn fallback_compliment(mut self, text: impl Into<String>) -> Self {
        self.config.fallback_compliment = text.into();
        self
    }

    pub fn empty_response_compliment(mut self, text: impl Into<String>) -> Self {
        self.config.empty_response_compliment = text.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: u64) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, ElogioError> {
        let c = &self.config;
        if let GeneratorBackend::Service { endpoint } = &c.backend {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ElogioError::InvalidConfig(format!(
                    "Endpoint must be an http(s) URL, got '{endpoint}'"
                )));
            }
        }
        if c.max_upload_bytes == 0 {
            return Err(ElogioError::InvalidConfig(
                "Upload limit must be ≥ 1 byte".into(),
            ));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(ElogioError::InvalidConfig(
                "Request timeout must be ≥ 1 second".into(),
            ));
        }
        if c.fallback_compliment.trim().is_empty() {
            return Err(ElogioError::InvalidConfig(
                "Fallback compliment must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hosted_app() {
        let c = PipelineConfig::default();
        assert_eq!(
            c.backend,
            GeneratorBackend::Service {
                endpoint: DEFAULT_ENDPOINT.into()
            }
        );
        assert_eq!(c.request_timeout_secs, None);
        assert_eq!(c.max_upload_bytes, 5_242_880);
        assert!(c.fallback_compliment.starts_with("Seu currículo mostra"));
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let err = PipelineConfig::builder()
            .endpoint("ftp://example.com/chat")
            .build()
            .unwrap_err();
        assert!(matches!(err, ElogioError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_timeout_and_limit() {
        assert!(PipelineConfig::builder()
            .request_timeout_secs(0)
            .build()
            .is_err());
        assert!(PipelineConfig::builder().max_upload_bytes(0).build().is_err());
    }

    #[test]
    fn llm_backend_skips_endpoint_check() {
        let c = PipelineConfig::builder()
            .llm(Some("openai".into()), Some("gpt-4.1-nano".into()))
            .build()
            .unwrap();
        assert!(matches!(c.backend, GeneratorBackend::Llm { .. }));
    }

    #[test]
    fn temperature_is_clamped() {
        let c = PipelineConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
    }
}
