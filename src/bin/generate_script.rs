use anyhow::Context;
use clap::Parser;
use podscript::config::{GeneratorArgs, PdfSettings};
use podscript::core::output::{write_outputs, OutputFormat};
use podscript::utils::{logger, validation::Validate};
use podscript::{GeminiGenerator, ScriptRequest, ScriptService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "generate-script")]
#[command(about = "Generate a podcast script once and save it to disk")]
struct Args {
    /// Podcast topic
    #[arg(short, long)]
    topic: String,

    /// Host name used in the script
    #[arg(long)]
    host_name: String,

    /// Directory for the generated files
    #[arg(short, long, default_value = "./output")]
    output_dir: PathBuf,

    /// Formats to write
    #[arg(long, value_enum, value_delimiter = ',', default_values = ["markdown", "html"])]
    formats: Vec<OutputFormat>,

    #[command(flatten)]
    generator: GeneratorArgs,

    /// Print the script to stdout as well
    #[arg(long)]
    print: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    // 載入設定：命令列為底，TOML 檔覆蓋
    let mut generator_settings = args.generator.to_settings();
    let mut pdf_settings = PdfSettings::default();
    match args.generator.load_toml() {
        Ok(Some(file)) => {
            file.generator.apply_to(&mut generator_settings);
            file.pdf.apply_to(&mut pdf_settings);
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    // 驗證配置
    if let Err(e) = generator_settings
        .validate()
        .and_then(|_| pdf_settings.validate())
    {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let generator =
        GeminiGenerator::new(generator_settings).context("Failed to build the HTTP client")?;
    let service = ScriptService::new(Arc::new(generator));
    let request = ScriptRequest::new(args.topic.clone(), args.host_name.clone());

    tracing::info!("🎙️ Generating script for topic: {}", args.topic);
    let response = match service.generate(&request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("❌ Generation failed: {} (Category: {:?})", e, e.category());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };

    if args.print {
        println!("{}", response.script);
    }

    let written = write_outputs(
        &args.output_dir,
        &response.script,
        &args.formats,
        &pdf_settings,
    )
    .await
    .with_context(|| format!("Failed to write outputs to {}", args.output_dir.display()))?;

    println!("✅ Script generated successfully!");
    for path in written {
        println!("📁 {}", path.display());
    }

    Ok(())
}
