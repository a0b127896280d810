use regex::Regex;
use std::sync::OnceLock;

const DIVIDER: &str = r#"<hr class="script-divider" />"#;

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 把模型回傳的 markdown 轉成顯示用的 HTML 片段
///
/// 只處理分隔線、三層標題、粗體、斜體與換行，其餘文字原樣保留。
/// 替換順序固定，後面的規則會看到前面規則的輸出。
pub fn render_script(script: &str) -> String {
    static H1_RE: OnceLock<Regex> = OnceLock::new();
    static H2_RE: OnceLock<Regex> = OnceLock::new();
    static H3_RE: OnceLock<Regex> = OnceLock::new();
    static STRONG_RE: OnceLock<Regex> = OnceLock::new();
    static EM_RE: OnceLock<Regex> = OnceLock::new();
    static NEWLINE_RE: OnceLock<Regex> = OnceLock::new();
    static BR_RUN_RE: OnceLock<Regex> = OnceLock::new();

    let h1 = H1_RE.get_or_init(|| Regex::new(r"(?imR)^# (.*)$").unwrap());
    let h2 = H2_RE.get_or_init(|| Regex::new(r"(?imR)^## (.*)$").unwrap());
    let h3 = H3_RE.get_or_init(|| Regex::new(r"(?imR)^### (.*)$").unwrap());
    let strong = STRONG_RE.get_or_init(|| Regex::new(r"(?R)\*\*(.*?)\*\*").unwrap());
    let em = EM_RE.get_or_init(|| Regex::new(r"(?R)\*(.*?)\*").unwrap());
    let newline = NEWLINE_RE.get_or_init(|| Regex::new(r"\r\n|\n|\r").unwrap());
    let br_run = BR_RUN_RE.get_or_init(|| Regex::new(r"<br />(\s*<br />)+").unwrap());

    let html = escape_html(script).replace("---", DIVIDER);
    let html = h1.replace_all(&html, r#"<h1 class="script-h1">$1</h1>"#);
    let html = h2.replace_all(&html, r#"<h2 class="script-h2">$1</h2>"#);
    let html = h3.replace_all(&html, r#"<h3 class="script-h3">$1</h3>"#);
    let html = strong.replace_all(&html, "<strong>$1</strong>");
    let html = em.replace_all(&html, "<em>$1</em>");
    let html = newline.replace_all(&html, "<br />");
    br_run.replace_all(&html, "<br /><br />").into_owned()
}

/// 獨立的 HTML 文件，CLI 輸出 `script.html` 時使用
pub fn render_document(title: &str, script: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n",
            "<title>{}</title>\n</head>\n<body>\n<div id=\"script-content\">{}</div>\n",
            "</body>\n</html>\n"
        ),
        escape_html(title),
        render_script(script)
    )
}
