use httpmock::prelude::*;
use podscript::{router, AppState, GeminiGenerator, GeneratorSettings, PdfSettings, ScriptService};
use serde_json::{json, Value};
use std::sync::Arc;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn generator_settings(base_url: String, api_key: Option<&str>) -> GeneratorSettings {
    GeneratorSettings {
        api_base_url: base_url,
        api_key: api_key.map(str::to_string),
        timeout_seconds: 5,
        ..GeneratorSettings::default()
    }
}

/// 在隨機 port 啟動服務，回傳 base url
async fn spawn_app(settings: GeneratorSettings) -> String {
    let generator = GeminiGenerator::new(settings).unwrap();
    let state = AppState::new(
        ScriptService::new(Arc::new(generator)),
        PdfSettings::default(),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_generate_returns_script() {
    let gemini = MockServer::start_async().await;
    let gemini_mock = gemini
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .header("x-goog-api-key", "test-key")
                .body_contains("**Host:** Alex")
                .body_contains("The Future of Artificial Intelligence");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(gemini_reply("# The AI Hour\n**Host:** Alex"));
        })
        .await;

    let base = spawn_app(generator_settings(gemini.base_url(), Some("test-key"))).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/generate", base))
        .json(&json!({"topic": "The Future of Artificial Intelligence", "hostName": "Alex"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"script": "# The AI Hour\n**Host:** Alex"}));
    gemini_mock.assert_async().await;
}

#[tokio::test]
async fn test_generate_rejects_other_methods() {
    let base = spawn_app(generator_settings("http://127.0.0.1:9".to_string(), Some("k"))).await;
    let client = reqwest::Client::new();

    let get = client
        .get(format!("{}/api/generate", base))
        .send()
        .await
        .unwrap();
    assert_eq!(get.status(), 405);
    let body: Value = get.json().await.unwrap();
    assert_eq!(body, json!({"error": "Method Not Allowed"}));

    let put = client
        .put(format!("{}/api/generate", base))
        .json(&json!({"topic": "t", "hostName": "h"}))
        .send()
        .await
        .unwrap();
    assert_eq!(put.status(), 405);
}

#[tokio::test]
async fn test_generate_requires_topic_and_host_name() {
    let gemini = MockServer::start_async().await;
    let gemini_mock = gemini
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(gemini_reply("unused"));
        })
        .await;

    let base = spawn_app(generator_settings(gemini.base_url(), Some("test-key"))).await;
    let client = reqwest::Client::new();

    for payload in [
        json!({"topic": "Space"}),
        json!({"hostName": "Alex"}),
        json!({"topic": "", "hostName": "Alex"}),
        json!({"topic": "Space", "hostName": ""}),
        json!({"topic": 123, "hostName": "Alex"}),
    ] {
        let response = client
            .post(format!("{}/api/generate", base))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400, "payload: {}", payload);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Topic and Host Name are required"}));
    }

    gemini_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_generate_with_malformed_body_is_bad_request() {
    let base = spawn_app(generator_settings("http://127.0.0.1:9".to_string(), Some("k"))).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/generate", base))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Topic and Host Name are required");
}

#[tokio::test]
async fn test_generate_without_api_key() {
    let gemini = MockServer::start_async().await;
    let gemini_mock = gemini
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(gemini_reply("unused"));
        })
        .await;

    let base = spawn_app(generator_settings(gemini.base_url(), None)).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/generate", base))
        .json(&json!({"topic": "Space", "hostName": "Alex"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": "API_KEY environment variable is not set."})
    );
    gemini_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_generate_checks_input_before_api_key() {
    let gemini = MockServer::start_async().await;
    let gemini_mock = gemini
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).json_body(gemini_reply("unused"));
        })
        .await;

    let base = spawn_app(generator_settings(gemini.base_url(), None)).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/generate", base))
        .json(&json!({"topic": "", "hostName": "A"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Topic and Host Name are required"}));
    gemini_mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_generate_checks_method_before_api_key() {
    let base = spawn_app(generator_settings("http://127.0.0.1:9".to_string(), None)).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/generate", base))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 405);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Method Not Allowed"}));
}

#[tokio::test]
async fn test_generate_upstream_failure_is_generic_500() {
    let gemini = MockServer::start_async().await;
    gemini
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(503).json_body(json!({
                "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
            }));
        })
        .await;

    let base = spawn_app(generator_settings(gemini.base_url(), Some("test-key"))).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/generate", base))
        .json(&json!({"topic": "Space", "hostName": "Alex"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"error": "Failed to communicate with the Gemini API."})
    );
}

#[tokio::test]
async fn test_generate_empty_model_reply_is_500() {
    let gemini = MockServer::start_async().await;
    gemini
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(json!({"candidates": []}));
        })
        .await;

    let base = spawn_app(generator_settings(gemini.base_url(), Some("test-key"))).await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/generate", base))
        .json(&json!({"topic": "Space", "hostName": "Alex"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_render_returns_markup() {
    let base = spawn_app(generator_settings("http://127.0.0.1:9".to_string(), None)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/render", base))
        .json(&json!({"script": "## Intro\n**Welcome** to the *show*"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["html"],
        r#"<h2 class="script-h2">Intro</h2><br /><strong>Welcome</strong> to the <em>show</em>"#
    );
}

#[tokio::test]
async fn test_pdf_download() {
    let base = spawn_app(generator_settings("http://127.0.0.1:9".to_string(), None)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/pdf", base))
        .json(&json!({"script": "# Episode\n\n**[00:00] - Intro**\nWelcome, everyone."}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/pdf"
    );
    assert_eq!(
        response.headers()["content-disposition"].to_str().unwrap(),
        "attachment; filename=\"podcast-script.pdf\""
    );
    let bytes = response.bytes().await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_pdf_requires_script() {
    let base = spawn_app(generator_settings("http://127.0.0.1:9".to_string(), None)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/pdf", base))
        .json(&json!({"script": "   "}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Script is required"}));
}

#[tokio::test]
async fn test_index_and_health() {
    let base = spawn_app(generator_settings("http://127.0.0.1:9".to_string(), None)).await;
    let client = reqwest::Client::new();

    let index = client.get(format!("{}/", base)).send().await.unwrap();
    assert_eq!(index.status(), 200);
    let html = index.text().await.unwrap();
    assert!(html.contains("AI Podcast Scriptwriter"));
    assert!(html.contains("/api/generate"));

    let health = client.get(format!("{}/healthz", base)).send().await.unwrap();
    assert_eq!(health.text().await.unwrap(), "ok");
}
