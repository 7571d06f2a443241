use festival_site_core::{FestivalCatalog, FestivalRecord, SearchHistory};

use crate::components::main::{csrf_input, escape, escape_attribute};
use crate::session::Session;

pub fn search_link(term: &str) -> String {
    let query = serde_urlencoded::to_string([("q", term)]).unwrap_or_default();
    format!("/search?{query}")
}

#[must_use]
pub fn search_form(value: &str) -> String {
    format!(
        r#"<form class="search" method="get" action="/search">
    <input id="search-input" name="q" type="search" placeholder="搜索节日名称" value="{}" autocomplete="off">
    <button type="submit">搜索</button>
    <a class="button" href="/">清空</a>
</form>"#,
        escape_attribute(value)
    )
}

#[must_use]
pub fn search_history(history: &SearchHistory, session: &Session) -> String {
    if history.is_empty() {
        return r#"<div id="search-history"><p>暂无搜索历史</p></div>"#.to_owned();
    }
    let chips: String = history
        .entries()
        .iter()
        .map(|term| {
            format!(
                r#"<a class="chip" href="{}">{}</a>"#,
                escape_attribute(&search_link(term)),
                escape(term)
            )
        })
        .collect();
    format!(
        r#"<div id="search-history"><p>搜索历史：{chips}</p><form method="post" action="/search/history/clear" enctype="application/x-www-form-urlencoded">{}<button class="chip danger" type="submit">清除历史</button></form></div>"#,
        csrf_input(session)
    )
}

#[must_use]
pub fn card(record: &FestivalRecord) -> String {
    format!(
        r#"<article class="card">
    <h4>{} <span class="date">（{}）</span></h4>
    <p>{}</p>
    <a class="button" href="/{}">查看详情</a>
</article>"#,
        escape(&record.name),
        escape(&record.date),
        escape(&record.description),
        escape_attribute(&record.link),
    )
}

pub fn cards<'a>(records: impl IntoIterator<Item = &'a FestivalRecord>) -> String {
    let mut html = String::from(r#"<div class="cards">"#);
    for record in records {
        html.push_str(&card(record));
    }
    html.push_str("</div>");
    html
}

#[must_use]
pub fn catalog(catalog: &FestivalCatalog) -> String {
    catalog
        .by_season()
        .into_iter()
        .map(|(season, records)| {
            format!(
                r#"<section class="season"><h2>{}</h2>{}</section>"#,
                escape(season),
                cards(records)
            )
        })
        .collect()
}
