//! A thin wrapper over the generative-model port.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::ports::GenerativeModel;
use crate::quiz::error::{QuizError, QuizResult};

/// Sampling temperature used for every quiz generation call.
pub const QUIZ_TEMPERATURE: f32 = 0.9;

/// Calls the model exactly once per prompt. No retries, no timeout of its own.
#[derive(Clone)]
pub struct ModelInvoker {
    model: Arc<dyn GenerativeModel>,
}

impl ModelInvoker {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn invoke(&self, prompt: &str) -> QuizResult<String> {
        info!(
            prompt_chars = prompt.len(),
            temperature = QUIZ_TEMPERATURE,
            "Calling generative model"
        );
        let started = Instant::now();

        let completion = self
            .model
            .complete(prompt, QUIZ_TEMPERATURE)
            .await
            .map_err(|e| {
                error!(elapsed = ?started.elapsed(), "Model call failed: {}", e);
                QuizError::ModelCallFailed(e)
            })?;

        info!(
            elapsed = ?started.elapsed(),
            response_chars = completion.len(),
            "Model call completed"
        );
        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{PortError, PortResult};
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Model {}

        #[async_trait]
        impl GenerativeModel for Model {
            async fn complete(&self, prompt: &str, temperature: f32) -> PortResult<String>;
        }
    }

    #[tokio::test]
    async fn passes_prompt_verbatim_at_fixed_temperature() {
        let mut model = MockModel::new();
        model
            .expect_complete()
            .withf(|prompt, temperature| {
                prompt == "exact prompt" && (*temperature - QUIZ_TEMPERATURE).abs() < f32::EPSILON
            })
            .times(1)
            .returning(|_, _| Ok("completion".to_string()));

        let invoker = ModelInvoker::new(Arc::new(model));
        let completion = invoker.invoke("exact prompt").await.unwrap();

        assert_eq!(completion, "completion");
    }

    #[tokio::test]
    async fn surfaces_failures_without_retrying() {
        let mut model = MockModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_, _| Err(PortError::Unexpected("rate limited".to_string())));

        let invoker = ModelInvoker::new(Arc::new(model));
        let err = invoker.invoke("prompt").await.unwrap_err();

        assert!(matches!(err, QuizError::ModelCallFailed(PortError::Unexpected(ref m)) if m == "rate limited"));
    }
}
