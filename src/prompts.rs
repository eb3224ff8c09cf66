//! Prompts for the LLM compliment backend.
//!
//! Only [`crate::pipeline::generate::LlmComplimentGenerator`] uses these;
//! the hosted compliment service has its own prompt server-side. Callers can
//! override the system prompt via
//! [`crate::config::PipelineConfig::system_prompt`].

/// Default system prompt: one warm, specific compliment in Portuguese.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"Você é um mentor de carreira caloroso e entusiasmado. Você receberá o texto extraído de um currículo.

Escreva UM elogio personalizado para a pessoa dona do currículo:

1. Cite pelo menos duas conquistas, habilidades ou experiências concretas do texto
2. Use um tom positivo, sincero e motivador, sem exageros vazios
3. Escreva em português do Brasil, em segunda pessoa ("você")
4. Use de 3 a 5 frases curtas
5. Não invente fatos que não estejam no currículo
6. Não use listas, títulos, Markdown ou emojis
7. Responda APENAS com o elogio"#;

/// Cap on the résumé text sent to the model, in characters.
pub const MAX_PROMPT_CHARS: usize = 12_000;

/// Build the user turn for a résumé.
///
/// Very long documents are cut at [`MAX_PROMPT_CHARS`] characters; the
/// opening pages carry the profile and recent experience.
pub fn user_prompt(document_text: &str) -> String {
    let text: String = document_text.chars().take(MAX_PROMPT_CHARS).collect();
    format!("Currículo:\n\n\"\"\"{}\"\"\"", text.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_prompt_wraps_text() {
        let p = user_prompt("  Ana Silva\nReact  \n");
        assert!(p.starts_with("Currículo:"));
        assert!(p.contains("\"\"\"Ana Silva\nReact\"\"\""));
    }

    #[test]
    fn user_prompt_truncates_on_char_boundary() {
        let long = "ç".repeat(MAX_PROMPT_CHARS + 50);
        let p = user_prompt(&long);
        assert_eq!(p.matches('ç').count(), MAX_PROMPT_CHARS);
    }
}
