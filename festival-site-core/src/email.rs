//! Completion of the email field with common mail providers.

pub const COMMON_DOMAINS: [&str; 10] = [
    "qq.com",
    "163.com",
    "126.com",
    "gmail.com",
    "outlook.com",
    "hotmail.com",
    "sina.com",
    "sohu.com",
    "yahoo.com",
    "foxmail.com",
];

/// Completions for a partially typed address. Nothing is offered once the
/// user typed an `@` themselves.
#[must_use]
pub fn complete(typed: &str) -> Vec<String> {
    let local = typed.trim();
    if local.is_empty() || local.contains('@') {
        return Vec::new();
    }
    COMMON_DOMAINS
        .iter()
        .map(|domain| format!("{local}@{domain}"))
        .collect()
}
