mod common;

use common::{get, query, send, state, text};
use http::header::{ETAG, IF_NONE_MATCH};
use http::StatusCode;
use serde_json::Value;

async fn json(uri: &str) -> Value {
    let state = state();
    let response = send(&state, get(uri)).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&text(response).await).unwrap()
}

#[tokio::test]
async fn suggestions_carry_highlight_segments() {
    let value = json(&query("/api/suggestions", &[("q", "团圆")])).await;
    let names: Vec<&str> = value["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["春节", "元宵节", "中秋节"]);
    assert_eq!(value["active"], Value::Null);
    assert_eq!(value["action"], serde_json::json!({ "type": "none" }));

    let value = json(&query("/api/suggestions", &[("q", "中秋")])).await;
    assert_eq!(
        value["items"][0]["segments"],
        serde_json::json!([
            { "text": "中秋", "emphasized": true },
            { "text": "节", "emphasized": false },
        ])
    );

    let value = json("/api/suggestions?q=").await;
    assert_eq!(value["items"], serde_json::json!([]));
}

#[tokio::test]
async fn suggestion_keys_move_and_select() {
    let value = json(&query("/api/suggestions", &[("q", "团圆"), ("key", "down")])).await;
    assert_eq!(value["active"], 0);
    assert_eq!(value["action"], serde_json::json!({ "type": "moved", "value": 0 }));

    let value = json(&query(
        "/api/suggestions",
        &[("q", "团圆"), ("active", "0"), ("key", "up")],
    ))
    .await;
    assert_eq!(value["active"], 2);

    let value = json(&query(
        "/api/suggestions",
        &[("q", "团圆"), ("active", "1"), ("key", "enter")],
    ))
    .await;
    assert_eq!(value["action"], serde_json::json!({ "type": "select", "value": "元宵节" }));
    assert_eq!(value["items"], serde_json::json!([]));

    let value = json(&query("/api/suggestions", &[("q", "团圆"), ("key", "enter")])).await;
    assert_eq!(value["action"], serde_json::json!({ "type": "search" }));

    let value = json(&query("/api/suggestions", &[("q", "团圆"), ("click", "2")])).await;
    assert_eq!(value["action"], serde_json::json!({ "type": "select", "value": "中秋节" }));
}

#[tokio::test]
async fn validate_reports_field_errors() {
    let value = json(&query("/api/validate", &[("field", "phone"), ("value", "123")])).await;
    assert_eq!(value["error"], "请输入有效的手机号码！");

    let value = json(&query("/api/validate", &[("field", "phone"), ("value", "")])).await;
    assert_eq!(value["error"], Value::Null);

    let value = json(&query("/api/validate", &[("field", "privacy"), ("consent", "true")])).await;
    assert_eq!(value["error"], Value::Null);

    let value = json(&query("/api/validate", &[("field", "privacy"), ("consent", "false")])).await;
    assert_eq!(value["error"], "请阅读并同意隐私政策！");

    let value = json(&query("/api/validate", &[("field", "nickname"), ("value", "x")])).await;
    assert_eq!(value["error"], Value::Null);
}

#[tokio::test]
async fn email_completion() {
    let value = json(&query("/api/email-suggestions", &[("q", "abc")])).await;
    let completions = value.as_array().unwrap();
    assert_eq!(completions.len(), 10);
    assert_eq!(completions[0], "abc@qq.com");

    let value = json(&query("/api/email-suggestions", &[("q", "abc@")])).await;
    assert_eq!(value, serde_json::json!([]));
}

#[tokio::test]
async fn stylesheet_honours_etag() {
    let state = state();
    let response = send(&state, get("/index.css")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let etag = response.headers()[ETAG].clone();
    assert!(text(response).await.contains(".card"));

    let mut request = get("/index.css");
    request.headers_mut().insert(IF_NONE_MATCH, etag);
    let response = send(&state, request).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn pages_load_the_script() {
    let state = state();
    let html = text(send(&state, get("/")).await).await;
    assert!(html.contains(r#"<script src="/index.js?v="#));

    let response = send(&state, get("/index.js")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(text(response).await.contains("/api/suggestions"));
}
