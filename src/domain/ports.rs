use crate::utils::error::Result;
use async_trait::async_trait;

/// 將 prompt 轉為腳本文字的外部生成服務
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn name(&self) -> &str;
}
