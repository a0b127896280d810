use crate::config::PdfSettings;
use crate::utils::error::{Result, ScriptError};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use regex::Regex;
use std::sync::OnceLock;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const PT_TO_MM: f32 = 0.352_778;
const LINE_SPACING: f32 = 1.4;
// Helvetica 的平均字寬約 0.5em
const AVG_CHAR_WIDTH_EM: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Heading1,
    Heading2,
    Heading3,
    Bold,
    Body,
    Blank,
}

impl LineStyle {
    fn scale(self) -> f32 {
        match self {
            LineStyle::Heading1 => 1.6,
            LineStyle::Heading2 => 1.35,
            LineStyle::Heading3 => 1.15,
            LineStyle::Bold | LineStyle::Body | LineStyle::Blank => 1.0,
        }
    }

    fn is_bold(self) -> bool {
        !matches!(self, LineStyle::Body | LineStyle::Blank)
    }

    fn line_height_mm(self, font_size: f32) -> f32 {
        font_size * self.scale() * LINE_SPACING * PT_TO_MM
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    pub style: LineStyle,
}

impl LayoutLine {
    fn blank() -> Self {
        Self {
            text: String::new(),
            style: LineStyle::Blank,
        }
    }
}

fn pdf_error(e: impl std::fmt::Debug) -> ScriptError {
    ScriptError::PdfError {
        message: format!("{:?}", e),
    }
}

/// 內建字型只涵蓋 ASCII，常見的排版符號換成近似字元
fn to_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' => out.push('-'),
            '\u{00A0}' | '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn strip_inline_markers(text: &str) -> String {
    static BULLET_RE: OnceLock<Regex> = OnceLock::new();
    static EM_RE: OnceLock<Regex> = OnceLock::new();

    let bullet = BULLET_RE.get_or_init(|| Regex::new(r"^(\s*)[*-]\s+").unwrap());
    let em = EM_RE.get_or_init(|| Regex::new(r"\*(.*?)\*").unwrap());

    let text = bullet.replace(text, "$1- ");
    let text = text.replace("**", "");
    em.replace_all(&text, "$1").into_owned()
}

fn classify(line: &str) -> (LineStyle, &str) {
    if let Some(rest) = line.strip_prefix("### ") {
        (LineStyle::Heading3, rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        (LineStyle::Heading2, rest)
    } else if let Some(rest) = line.strip_prefix("# ") {
        (LineStyle::Heading1, rest)
    } else if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
        (LineStyle::Bold, line)
    } else {
        (LineStyle::Body, line)
    }
}

fn max_chars(font_size: f32, style: LineStyle) -> usize {
    let usable_width_pt = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) / PT_TO_MM;
    let chars = usable_width_pt / (font_size * style.scale() * AVG_CHAR_WIDTH_EM);
    (chars.floor() as usize).max(10)
}

/// 以字數為單位斷行，過長的單字直接切開；縮排最多佔一半寬度
fn wrap(text: &str, width: usize) -> Vec<String> {
    let indent: String = text
        .chars()
        .take_while(|c| *c == ' ')
        .take(width / 2)
        .collect();
    let room = width - indent.len();
    let mut lines = Vec::new();
    let mut current = indent.clone();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > room {
            if !current.trim().is_empty() {
                lines.push(std::mem::replace(&mut current, indent.clone()));
            }
            let rest = word.split_off(room);
            let chunk: String = word.into_iter().collect();
            lines.push(format!("{}{}", indent, chunk));
            word = rest;
        }
        let word: String = word.into_iter().collect();

        let needed = if current.trim().is_empty() {
            current.len() + word.len()
        } else {
            current.len() + 1 + word.len()
        };
        if needed > width && !current.trim().is_empty() {
            lines.push(std::mem::replace(&mut current, indent.clone()));
        }
        if !current.trim().is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.trim().is_empty() {
        lines.push(current);
    }
    lines
}

/// 將腳本拆成排版用的行：標題、粗體行、內文與空行
pub fn layout_lines(script: &str, font_size: f32) -> Vec<LayoutLine> {
    let mut lines: Vec<LayoutLine> = Vec::new();

    let push_blank = |lines: &mut Vec<LayoutLine>| {
        if lines.last().is_some_and(|l| l.style != LineStyle::Blank) {
            lines.push(LayoutLine::blank());
        }
    };

    for raw in script.lines() {
        // 與畫面一致：任何位置的 `---` 都是分隔線
        for (index, segment) in raw.split("---").enumerate() {
            if index > 0 {
                push_blank(&mut lines);
            }
            let segment = if index > 0 {
                segment.trim()
            } else {
                segment.trim_end()
            };
            if segment.is_empty() {
                if index == 0 {
                    push_blank(&mut lines);
                }
                continue;
            }

            let (style, body) = classify(segment);
            let text = to_pdf_text(&strip_inline_markers(body));
            for wrapped in wrap(&text, max_chars(font_size, style)) {
                lines.push(LayoutLine {
                    text: wrapped,
                    style,
                });
            }
        }
    }

    while lines.last().is_some_and(|l| l.style == LineStyle::Blank) {
        lines.pop();
    }
    lines
}

/// 依頁面可用高度分頁，至少回傳一頁；頁首的空行會被略過
pub fn paginate(lines: &[LayoutLine], font_size: f32) -> Vec<Vec<&LayoutLine>> {
    let usable_height = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;
    let mut pages: Vec<Vec<&LayoutLine>> = Vec::new();
    let mut current: Vec<&LayoutLine> = Vec::new();
    let mut used = 0.0;

    for line in lines {
        let height = line.style.line_height_mm(font_size);
        if used + height > usable_height {
            pages.push(std::mem::take(&mut current));
            used = 0.0;
        }
        if current.is_empty() && line.style == LineStyle::Blank {
            continue;
        }
        current.push(line);
        used += height;
    }

    pages.push(current);
    pages
}

/// 產生 A4 直式的多頁 PDF
pub fn export_pdf(script: &str, settings: &PdfSettings) -> Result<Vec<u8>> {
    let font_size = settings.font_size;
    let lines = layout_lines(script, font_size);
    let pages = paginate(&lines, font_size);

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Podcast Script",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Page 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Page {}", index + 1),
            );
            doc.get_page(page_index).get_layer(layer_index)
        };

        let mut y = PAGE_HEIGHT_MM - MARGIN_MM;
        for line in page {
            y -= line.style.line_height_mm(font_size);
            if line.style == LineStyle::Blank {
                continue;
            }
            let font = if line.style.is_bold() { &bold } else { &regular };
            layer.use_text(
                line.text.clone(),
                font_size * line.style.scale(),
                Mm(MARGIN_MM),
                Mm(y),
                font,
            );
        }
    }

    tracing::debug!("Rendered PDF with {} page(s)", pages.len());
    doc.save_to_bytes().map_err(pdf_error)
}
