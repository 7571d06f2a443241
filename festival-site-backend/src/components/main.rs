use std::borrow::Cow;

use crate::routes::assets::ASSET_VERSION;
use crate::session::Session;

pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_safe(text)
}

pub fn escape_attribute(text: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(text)
}

/// Hidden field carrying the session's CSRF token.
#[must_use]
pub fn csrf_input(session: &Session) -> String {
    format!(
        r#"<input type="hidden" name="csrf_token" value="{}">"#,
        escape_attribute(session.csrf_token())
    )
}

/// The page frame shared by every page. `inner` must already be escaped.
#[must_use]
pub fn main(page_title: &str, inner: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="zh-CN">

<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} - 中国传统节日</title>
    <link rel="stylesheet" href="/index.css?v={ASSET_VERSION}">
    <script src="/index.js?v={ASSET_VERSION}" defer></script>
</head>

<body>
    <nav>
        <span>中国传统节日</span>
        <ul>
            <li>
                <a href="/">节日</a>
            </li>
            <li>
                <a href="/feedback">留言</a>
            </li>
        </ul>
    </nav>
    <main>
        {inner}
    </main>
</body>

</html>
"#,
        title = escape(page_title),
    )
}
