mod common;

use common::{get, get_as, post, post_as, send, state, state_with_delays, text, TOKEN};
use festival_site_core::form::{AGGREGATE_ERROR_NOTICE, SUCCESS_NOTICE};
use http::header::LOCATION;
use http::StatusCode;

fn valid_form<'a>(message: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("csrf_token", TOKEN),
        ("name", "张三"),
        ("email", "zhangsan@example.com"),
        ("phone", ""),
        ("wechat", ""),
        ("subject", "节日咨询"),
        ("message", message),
        ("privacy", "on"),
    ]
}

#[tokio::test]
async fn accepted_feedback_is_counted_and_announced() {
    let state = state();
    let html = text(send(&state, get("/feedback")).await).await;
    assert!(html.contains("已收到 0 条留言"));

    let response = send(&state, post("/feedback", &valid_form("春节的习俗介绍得非常详细。"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/feedback");

    let html = text(send(&state, get("/feedback")).await).await;
    assert!(html.contains(SUCCESS_NOTICE));
    assert!(html.contains("已收到 1 条留言"));
}

#[tokio::test]
async fn resubmitting_during_cooldown_is_ignored() {
    let state = state();
    send(&state, post("/feedback", &valid_form("春节的习俗介绍得非常详细。"))).await;

    let response = send(&state, post("/feedback", &valid_form("元宵节的灯谜也很有意思。"))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = text(send(&state, get("/feedback")).await).await;
    assert!(html.contains("已收到 1 条留言"));
}

#[tokio::test]
async fn invalid_feedback_is_rendered_with_errors() {
    let state = state();
    let response = send(&state, post("/feedback", &valid_form("太短了"))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = text(response).await;
    assert!(html.contains(AGGREGATE_ERROR_NOTICE));
    assert!(html.contains("留言内容至少需要10个字符！"));
    assert!(html.contains("已收到 0 条留言"));
    // the typed values are kept
    assert!(html.contains("zhangsan@example.com"));
}

#[tokio::test]
async fn missing_consent_is_reported() {
    let state = state();
    let mut form = valid_form("春节的习俗介绍得非常详细。");
    form.retain(|(name, _)| *name != "privacy");

    let html = text(send(&state, post("/feedback", &form)).await).await;
    assert!(html.contains("请阅读并同意隐私政策！"));
}

#[tokio::test]
async fn forged_submissions_are_rejected() {
    let state = state();
    let mut form = valid_form("春节的习俗介绍得非常详细。");
    form[0] = ("csrf_token", "forged");

    let response = send(&state, post("/feedback", &form)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = text(send(&state, get("/feedback")).await).await;
    assert!(html.contains("已收到 0 条留言"));
}

#[tokio::test]
async fn rejected_forms_are_not_kept() {
    let state = state();
    for index in 0..50 {
        let token = format!("visitor{index}");
        let mut form = valid_form("太短了");
        form[0] = ("csrf_token", &token);
        let response = send(&state, post_as("/feedback", &form, &token)).await;
        assert!(text(response).await.contains(AGGREGATE_ERROR_NOTICE));

        let html = text(send(&state, get_as("/feedback", &token)).await).await;
        assert!(!html.contains(AGGREGATE_ERROR_NOTICE));
        assert!(!html.contains("zhangsan@example.com"));
    }
    assert_eq!(state.pending_forms().unwrap(), 0);
}

#[tokio::test]
async fn accepted_forms_are_kept_until_their_deadlines() {
    let state = state();
    send(&state, post("/feedback", &valid_form("春节的习俗介绍得非常详细。"))).await;
    assert_eq!(state.pending_forms().unwrap(), 1);

    let state = state_with_delays(0);
    send(&state, post("/feedback", &valid_form("春节的习俗介绍得非常详细。"))).await;
    // no GET /feedback in between
    assert_eq!(state.pending_forms().unwrap(), 0);
}
