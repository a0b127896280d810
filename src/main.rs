use clap::Parser;
use podscript::utils::{logger, validation::Validate};
use podscript::{AppSettings, CliConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let settings = match AppSettings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting podscript server");
    tracing::debug!("Generator settings: {:?}", settings.generator);

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = podscript::server::serve(&settings).await {
        tracing::error!(
            "❌ Server failed: {} (Category: {:?})",
            e,
            e.category()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(2);
    }

    Ok(())
}
