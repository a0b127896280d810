pub mod gemini;
pub mod markdown;
pub mod output;
pub mod pdf;
pub mod prompt;
pub mod service;

pub use crate::domain::model::{ScriptRequest, ScriptResponse};
pub use crate::domain::ports::ScriptGenerator;
pub use crate::utils::error::Result;
