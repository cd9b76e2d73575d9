pub mod ollama;
pub mod openai;

use reportlens_core::config::{LlmConfig, OllamaConfig};

use crate::provider::{LlmError, LlmProvider};

/// Create the appropriate LLM provider based on config.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    match llm_config.provider.as_str() {
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.openai_model.clone(),
                llm_config.openai_base_url.clone(),
            )))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reportlens_core::Config;

    #[test]
    fn builds_selected_provider() {
        let mut config = Config::for_profile("REPORTLENS_TEST_UNUSED");
        config.llm.provider = "openai".into();
        config.llm.openai_api_key = Some("sk-test".into());
        config.llm.openai_model = "gpt-4o".into();
        let provider = create_provider(&config.llm, &config.ollama).unwrap();
        assert_eq!(provider.model(), "gpt-4o");

        config.llm.provider = "ollama".into();
        config.ollama.model = "llama3.2".into();
        let provider = create_provider(&config.llm, &config.ollama).unwrap();
        assert_eq!(provider.model(), "llama3.2");
    }

    #[test]
    fn openai_without_key_is_not_configured() {
        let mut config = Config::for_profile("REPORTLENS_TEST_UNUSED");
        config.llm.provider = "openai".into();
        config.llm.openai_api_key = None;
        assert!(matches!(
            create_provider(&config.llm, &config.ollama),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn unknown_provider_is_not_configured() {
        let mut config = Config::for_profile("REPORTLENS_TEST_UNUSED");
        config.llm.provider = "gemini".into();
        assert!(matches!(
            create_provider(&config.llm, &config.ollama),
            Err(LlmError::NotConfigured(msg)) if msg.contains("gemini")
        ));
    }
}
