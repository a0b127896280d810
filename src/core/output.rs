use crate::config::PdfSettings;
use crate::core::markdown::render_document;
use crate::core::pdf::export_pdf;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Html,
    Pdf,
}

impl OutputFormat {
    pub fn file_name<'a>(&self, pdf: &'a PdfSettings) -> &'a str {
        match self {
            OutputFormat::Markdown => "script.md",
            OutputFormat::Html => "script.html",
            OutputFormat::Pdf => &pdf.filename,
        }
    }
}

/// 依格式把腳本寫到輸出目錄，回傳寫出的檔案路徑
pub async fn write_outputs(
    output_dir: &Path,
    script: &str,
    formats: &[OutputFormat],
    pdf: &PdfSettings,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(output_dir).await?;

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let data = match format {
            OutputFormat::Markdown => script.as_bytes().to_vec(),
            OutputFormat::Html => render_document("Podcast Script", script).into_bytes(),
            OutputFormat::Pdf => export_pdf(script, pdf)?,
        };

        let path = output_dir.join(format.file_name(pdf));
        tracing::debug!("Writing {} bytes to {}", data.len(), path.display());
        tokio::fs::write(&path, &data).await?;
        written.push(path);
    }

    Ok(written)
}
