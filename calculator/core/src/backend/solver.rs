//! Math Solver
//!
//! Wraps an [`LlmBackend`] behind a call that always produces display text.
//! Backend failures (network, auth, malformed responses) are logged and
//! turned into an apologetic message here, so callers never see an error.

use super::traits::{LlmBackend, LlmRequest};
use crate::config::AssistantConfig;

/// Instruction sent with every question
pub const SYSTEM_INSTRUCTION: &str = "You are AuraCalc AI, a world-class mathematical assistant.
Your goals:
1. Help users solve complex math problems, word problems, and equations.
2. Provide step-by-step explanations for mathematical concepts.
3. Be concise but thorough.
4. Format math expressions using clean notation.
5. If asked for a simple calculation that can be done on a normal calculator, provide the result immediately.
6. If asked about units or conversions, provide the formula used.";

/// Reply used when the model returns no text
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that request.";

/// Reply used when the backend call fails
pub const FAILURE_REPLY: &str = "Error: Failed to connect to the AI assistant. Please try again.";

/// Turns natural-language math questions into answer text
pub struct Solver<B: LlmBackend> {
    backend: B,
    model: String,
    temperature: f32,
    system_prompt: String,
}

impl<B: LlmBackend> Solver<B> {
    /// Create a solver with default model settings
    pub fn new(backend: B) -> Self {
        Self::from_config(backend, &AssistantConfig::default())
    }

    /// Create a solver using the assistant configuration
    pub fn from_config(backend: B, config: &AssistantConfig) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            temperature: config.temperature,
            system_prompt: config.system_prompt.clone(),
        }
    }

    /// The wrapped backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Model identifier sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request for a question
    pub fn request_for(&self, query: &str) -> LlmRequest {
        LlmRequest::new(query, &self.model)
            .with_system(self.system_prompt.clone())
            .with_temperature(self.temperature)
    }

    /// Answer a question; never fails
    pub async fn solve(&self, query: &str) -> String {
        let request = self.request_for(query);

        match self.backend.send(&request).await {
            Ok(response) if response.content.trim().is_empty() => {
                tracing::warn!(backend = self.backend.name(), "Model returned an empty reply");
                EMPTY_REPLY.to_string()
            }
            Ok(response) => {
                tracing::debug!(
                    backend = self.backend.name(),
                    tokens = ?response.tokens_used,
                    duration_ms = ?response.duration_ms,
                    "Assistant reply received"
                );
                response.content
            }
            Err(e) => {
                tracing::error!(backend = self.backend.name(), error = %e, "Assistant request failed");
                FAILURE_REPLY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::backend::LlmResponse;

    /// Backend returning a fixed outcome and remembering the last request
    struct ScriptedBackend {
        reply: Option<String>,
        last_request: Mutex<Option<LlmRequest>>,
    }

    impl ScriptedBackend {
        fn replying(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(String::from),
                last_request: Mutex::new(None),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "Scripted"
        }

        async fn health_check(&self) -> bool {
            true
        }

        async fn send(&self, request: &LlmRequest) -> anyhow::Result<LlmResponse> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            match &self.reply {
                Some(content) => Ok(LlmResponse {
                    content: content.clone(),
                    model: request.model.clone(),
                    tokens_used: None,
                    duration_ms: None,
                }),
                None => anyhow::bail!("connection refused"),
            }
        }
    }

    #[tokio::test]
    async fn test_solve_returns_model_text() {
        let solver = Solver::new(ScriptedBackend::replying(Some("x = 4")));
        assert_eq!(solver.solve("2x = 8").await, "x = 4");

        let request = solver.backend().last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.prompt, "2x = 8");
        assert_eq!(request.system.as_deref(), Some(SYSTEM_INSTRUCTION));
        assert_eq!(request.model, solver.model());
    }

    #[tokio::test]
    async fn test_solve_maps_empty_reply() {
        let solver = Solver::new(ScriptedBackend::replying(Some("  ")));
        assert_eq!(solver.solve("?").await, EMPTY_REPLY);
    }

    #[tokio::test]
    async fn test_solve_maps_failure() {
        let solver = Solver::new(ScriptedBackend::replying(None));
        assert_eq!(solver.solve("2+2").await, FAILURE_REPLY);
    }

    #[test]
    fn test_request_uses_config() {
        let config = AssistantConfig {
            model: "custom-model".to_string(),
            temperature: 0.2,
            system_prompt: "Only numbers.".to_string(),
            ..AssistantConfig::default()
        };
        let solver = Solver::from_config(ScriptedBackend::replying(None), &config);
        let request = solver.request_for("1+1");

        assert_eq!(request.model, "custom-model");
        assert!((request.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(request.system.as_deref(), Some("Only numbers."));
    }
}
