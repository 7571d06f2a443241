use std::time::Instant;

use bytes::Bytes;
use chrono::Utc;
use festival_site_core::form::{FormValues, Marker, NoticeKind, SubmitOutcome};
use festival_site_core::{FeedbackLog, Field, FormController};
use headers::ContentType;
use http::{Request, Response, StatusCode};
use http_body::Body;
use http_body_util::Full;
use serde::Deserialize;
use tracing::debug;

use crate::components::main::{csrf_input, escape, escape_attribute, main};
use crate::error::AppError;
use crate::routes::search::redirect;
use crate::session::{CsrfSafeForm, CsrfToken, ResponseSessionExt as _, Session};
use crate::{AppState, ResponseTypedHeaderExt as _};

pub const SUBJECTS: [&str; 4] = ["节日咨询", "活动建议", "合作交流", "其他"];

#[derive(Deserialize)]
pub struct FeedbackPayload {
    csrf_token: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    wechat: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    message: String,
    /// Only present when the checkbox is ticked.
    privacy: Option<String>,
}

impl CsrfToken for FeedbackPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

impl From<FeedbackPayload> for FormValues {
    fn from(payload: FeedbackPayload) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            wechat: payload.wechat,
            subject: payload.subject,
            message: payload.message,
            privacy: payload.privacy.is_some(),
        }
    }
}

pub fn show(state: &AppState, session: Session) -> Result<Response<Full<Bytes>>, AppError> {
    let (form, count) = {
        let site = state.site()?;
        let count = FeedbackLog::count(&*site.store)?;
        let form = site
            .forms
            .get(session.csrf_token())
            .cloned()
            .unwrap_or_else(|| state.new_form());
        (form, count)
    };
    page(&form, count, session)
}

pub async fn submit<B>(
    state: &AppState,
    request: Request<B>,
    session: Session,
) -> Result<Response<Full<Bytes>>, AppError>
where
    B: Body<Data = Bytes>,
    AppError: From<B::Error>,
{
    let form = CsrfSafeForm::<FeedbackPayload>::from_request(request, &session).await?;

    let (outcome, form, count) = {
        let mut site = state.site()?;
        let site = &mut *site;
        let controller = site
            .forms
            .entry(session.csrf_token().to_owned())
            .or_insert_with(|| state.new_form());
        controller.fill(form.value.into());
        let outcome = controller.submit(&mut *site.store, Instant::now(), Utc::now())?;
        let form = controller.clone();
        if matches!(outcome, SubmitOutcome::Rejected(_)) {
            // the rejection page carries the values, nothing stays pending
            site.forms.remove(session.csrf_token());
        }
        (outcome, form, FeedbackLog::count(&*site.store)?)
    };

    match outcome {
        SubmitOutcome::Ignored | SubmitOutcome::Accepted(_) => redirect("/feedback", session),
        SubmitOutcome::Rejected(errors) => {
            debug!("feedback rejected with {} errors", errors.len());
            page(&form, count, session)
        }
    }
}

fn field_class(marker: &Marker) -> &'static str {
    match marker {
        Marker::Unmarked => "",
        Marker::Valid => "valid",
        Marker::Invalid(_) => "error",
    }
}

fn field_error(marker: &Marker) -> String {
    marker.error().map_or_else(String::new, |error| {
        format!(r#"<div class="error-message">{}</div>"#, escape(&error.to_string()))
    })
}

fn text_field(form: &FormController, field: Field, label: &str, kind: &str) -> String {
    let marker = form.marker(field);
    format!(
        r#"<label for="{name}">{label}</label>
<input class="{class}" id="{name}" name="{name}" type="{kind}" value="{value}">
{error}"#,
        name = field.as_str(),
        class = field_class(marker),
        value = escape_attribute(form.values().get(field)),
        error = field_error(marker),
    )
}

fn notice(form: &FormController) -> String {
    form.notice().map_or_else(String::new, |notice| {
        let class = match notice.kind {
            NoticeKind::Success => "notice success",
            NoticeKind::Error => "notice error-message",
        };
        format!(r#"<div class="{class}">{}</div>"#, escape(notice.text))
    })
}

fn subject_field(form: &FormController) -> String {
    let marker = form.marker(Field::Subject);
    let options: String = SUBJECTS
        .into_iter()
        .map(|option| {
            let selected = if form.values().subject == option { " selected" } else { "" };
            format!(r#"<option value="{option}"{selected}>{option}</option>"#)
        })
        .collect();
    format!(
        r#"<label for="subject">留言主题</label>
<select class="{}" id="subject" name="subject">
<option value="">请选择</option>{options}</select>{}"#,
        field_class(marker),
        field_error(marker),
    )
}

fn page(
    form: &FormController,
    count: usize,
    session: Session,
) -> Result<Response<Full<Bytes>>, AppError> {
    let message = form.marker(Field::Message);
    let privacy = form.marker(Field::Privacy);
    let inner = format!(
        r#"<h1 class="center">留言板</h1>
<p class="center">已收到 {count} 条留言</p>
{notice}
<form id="feedback-form" class="container-small" method="post" action="/feedback" enctype="application/x-www-form-urlencoded">
{csrf}
{name}
{email}
{phone}
{wechat}
{subject}
<label for="message">留言内容</label>
<textarea class="{message_class}" id="message" name="message" rows="6">{message_value}</textarea>
{message_error}
<label class="{privacy_class}"><input id="privacy" name="privacy" type="checkbox"{checked}> 我已阅读并同意隐私政策</label>
{privacy_error}
<button type="submit">提交留言</button>
</form>"#,
        notice = notice(form),
        csrf = csrf_input(&session),
        name = text_field(form, Field::Name, "姓名", "text"),
        email = text_field(form, Field::Email, "邮箱", "email"),
        phone = text_field(form, Field::Phone, "手机号码（选填）", "tel"),
        wechat = text_field(form, Field::Wechat, "微信号（选填）", "text"),
        subject = subject_field(form),
        message_class = field_class(message),
        message_value = escape(&form.values().message),
        message_error = field_error(message),
        privacy_class = field_class(privacy),
        checked = if form.values().privacy { " checked" } else { "" },
        privacy_error = field_error(privacy),
    );

    Ok(Response::builder()
        .with_session(session)
        .status(StatusCode::OK)
        .typed_header(ContentType::html())
        .body(Full::new(Bytes::from(main("留言板", &inner))))?)
}
