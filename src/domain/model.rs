use serde::{Deserialize, Serialize};

/// 前端表單送出的內容
///
/// 欄位缺少時以 `None` 表示，由 handler 統一回傳 400。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default, rename = "hostName")]
    pub host_name: Option<String>,
}

impl ScriptRequest {
    pub fn new(topic: impl Into<String>, host_name: impl Into<String>) -> Self {
        Self {
            topic: Some(topic.into()),
            host_name: Some(host_name.into()),
        }
    }

    /// 兩個欄位都非空字串時回傳 (topic, host_name)
    pub fn fields(&self) -> Option<(&str, &str)> {
        let topic = self.topic.as_deref().filter(|t| !t.is_empty())?;
        let host_name = self.host_name.as_deref().filter(|h| !h.is_empty())?;
        Some((topic, host_name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptResponse {
    pub script: String,
}

/// `/api/render` 與 `/api/pdf` 的輸入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptPayload {
    #[serde(default)]
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResponse {
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
