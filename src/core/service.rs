use crate::core::prompt::build_prompt;
use crate::core::{Result, ScriptGenerator, ScriptRequest, ScriptResponse};
use crate::utils::error::ScriptError;
use std::sync::Arc;
use std::time::Instant;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Topic and Host Name are required";

/// 驗證輸入、組 prompt、呼叫生成服務
#[derive(Clone)]
pub struct ScriptService {
    generator: Arc<dyn ScriptGenerator>,
}

impl ScriptService {
    pub fn new(generator: Arc<dyn ScriptGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate(&self, request: &ScriptRequest) -> Result<ScriptResponse> {
        let (topic, host_name) = request.fields().ok_or_else(|| ScriptError::ValidationError {
            message: REQUIRED_FIELDS_MESSAGE.to_string(),
        })?;

        let prompt = build_prompt(topic, host_name);
        tracing::info!(
            "Generating script with {} (topic: {} chars, host: {})",
            self.generator.name(),
            topic.chars().count(),
            host_name
        );

        let started = Instant::now();
        let script = self.generator.generate(&prompt).await?;
        tracing::info!(
            "Script generated: {} chars in {:?}",
            script.chars().count(),
            started.elapsed()
        );

        Ok(ScriptResponse { script })
    }
}
