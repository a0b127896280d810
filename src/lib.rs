pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use crate::config::{AppSettings, CliConfig, GeneratorSettings, PdfSettings, TomlConfig};
pub use crate::core::{gemini::GeminiGenerator, service::ScriptService};
pub use crate::domain::model::{ScriptRequest, ScriptResponse};
pub use crate::domain::ports::ScriptGenerator;
pub use crate::server::{router, AppState};
pub use crate::utils::error::{Result, ScriptError};
