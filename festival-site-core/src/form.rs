use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::store::{load_json, save_json, PersistentStore};
use crate::validation::{validate, Field, FieldError};

pub const FEEDBACK_MESSAGES_KEY: &str = "feedbackMessages";

pub const RESUBMIT_COOLDOWN: Duration = Duration::from_millis(1500);
pub const NOTICE_DISMISS_DELAY: Duration = Duration::from_millis(3000);

pub const AGGREGATE_ERROR_NOTICE: &str = "请检查并修正表单中的错误！";
pub const SUCCESS_NOTICE: &str = "感谢您的留言！我们会尽快通过您选择的联系方式回复您。";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    /// Milliseconds since the unix epoch at submission.
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub wechat: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// The persisted sequence of feedback messages. Only [`FormController`] appends.
pub struct FeedbackLog;

impl FeedbackLog {
    pub fn load<S: PersistentStore + ?Sized>(store: &S) -> Result<Vec<FeedbackMessage>, StoreError> {
        load_json(store, FEEDBACK_MESSAGES_KEY)
    }

    pub fn count<S: PersistentStore + ?Sized>(store: &S) -> Result<usize, StoreError> {
        Ok(Self::load(store)?.len())
    }

    // no cap, the log grows with every submission
    fn append<S: PersistentStore + ?Sized>(
        store: &mut S,
        message: FeedbackMessage,
    ) -> Result<usize, StoreError> {
        let mut messages = Self::load(store)?;
        messages.push(message);
        save_json(store, FEEDBACK_MESSAGES_KEY, &messages)?;
        Ok(messages.len())
    }
}

/// Raw values as typed into the form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub wechat: String,
    pub subject: String,
    pub message: String,
    pub privacy: bool,
}

impl FormValues {
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Wechat => &self.wechat,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
            Field::Privacy => "",
        }
    }

    fn set(&mut self, field: Field, value: &str) {
        let value = value.to_owned();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Wechat => self.wechat = value,
            Field::Subject => self.subject = value,
            Field::Message => self.message = value,
            // a checkbox only submits a value when it is checked
            Field::Privacy => self.privacy = !value.trim().is_empty(),
        }
    }

    fn check(&self, field: Field) -> Result<(), FieldError> {
        validate(field, self.get(field), self.privacy)
    }

    fn into_message(self, at: DateTime<Utc>) -> FeedbackMessage {
        let optional = |value: String| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_owned())
        };
        FeedbackMessage {
            id: at.timestamp_millis(),
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            phone: optional(self.phone),
            subject: self.subject.trim().to_owned(),
            message: self.message.trim().to_owned(),
            wechat: optional(self.wechat),
            timestamp: at,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Marker {
    #[default]
    Unmarked,
    Valid,
    Invalid(FieldError),
}

impl Marker {
    #[must_use]
    pub const fn error(&self) -> Option<FieldError> {
        match self {
            Self::Invalid(error) => Some(*error),
            Self::Unmarked | Self::Valid => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission is still cooling down.
    Ignored,
    Rejected(Vec<FieldError>),
    Accepted(FeedbackMessage),
}

/// The feedback form: field markers, the submit state machine and the notice.
///
/// Deferred transitions are deadlines, not timers. Callers pass the current
/// [`Instant`] and [`FormController::tick`] fires whatever is due, so the resubmit
/// cooldown and the notice dismissal run independently of each other.
#[derive(Debug, Clone)]
pub struct FormController {
    values: FormValues,
    markers: BTreeMap<Field, Marker>,
    state: SubmitState,
    notice: Option<Notice>,
    cooldown_until: Option<Instant>,
    notice_until: Option<Instant>,
    resubmit_cooldown: Duration,
    notice_dismiss_delay: Duration,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    #[must_use]
    pub fn new() -> Self {
        Self::with_delays(RESUBMIT_COOLDOWN, NOTICE_DISMISS_DELAY)
    }

    #[must_use]
    pub fn with_delays(resubmit_cooldown: Duration, notice_dismiss_delay: Duration) -> Self {
        Self {
            values: FormValues::default(),
            markers: BTreeMap::new(),
            state: SubmitState::Idle,
            notice: None,
            cooldown_until: None,
            notice_until: None,
            resubmit_cooldown,
            notice_dismiss_delay,
        }
    }

    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    #[must_use]
    pub const fn state(&self) -> SubmitState {
        self.state
    }

    #[must_use]
    pub const fn notice(&self) -> Option<Notice> {
        self.notice
    }

    #[must_use]
    pub fn marker(&self, field: Field) -> &Marker {
        self.markers.get(&field).unwrap_or(&Marker::Unmarked)
    }

    /// Nothing is pending: no cooldown and no visible notice.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self.state, SubmitState::Idle) && self.notice.is_none()
    }

    /// Replaces all values at once, e.g. from a posted form. Markers are kept.
    pub fn fill(&mut self, values: FormValues) {
        self.values = values;
    }

    /// A keystroke in `field`.
    pub fn input(&mut self, field: Field, value: &str) -> &Marker {
        self.values.set(field, value);
        self.mark(field)
    }

    /// `field` lost focus.
    pub fn blur(&mut self, field: Field) -> &Marker {
        self.mark(field)
    }

    pub fn set_consent(&mut self, consent: bool) -> &Marker {
        self.values.privacy = consent;
        self.mark(Field::Privacy)
    }

    fn mark(&mut self, field: Field) -> &Marker {
        let marker = match self.values.check(field) {
            Err(error) => Marker::Invalid(error),
            Ok(()) if field.is_required() || !self.values.get(field).trim().is_empty() => {
                Marker::Valid
            }
            Ok(()) => Marker::Unmarked,
        };
        self.markers.insert(field, marker);
        &self.markers[&field]
    }

    /// Fires the deferred transitions that are due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.cooldown_until.is_some_and(|deadline| now >= deadline) {
            debug!("resubmit cooldown finished");
            self.cooldown_until = None;
            self.state = SubmitState::Idle;
        }
        if self.notice_until.is_some_and(|deadline| now >= deadline) {
            debug!("notice dismissed");
            self.notice_until = None;
            self.notice = None;
        }
    }

    /// Hides the notice right away. The resubmit cooldown keeps running.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
        self.notice_until = None;
    }

    /// Re-enables submitting right away. A visible notice stays until its own deadline.
    pub fn cancel_cooldown(&mut self) {
        self.cooldown_until = None;
        self.state = SubmitState::Idle;
    }

    pub fn submit<S: PersistentStore + ?Sized>(
        &mut self,
        store: &mut S,
        now: Instant,
        at: DateTime<Utc>,
    ) -> Result<SubmitOutcome, StoreError> {
        self.tick(now);
        if self.state == SubmitState::Submitting {
            debug!("ignoring submit while the previous one cools down");
            return Ok(SubmitOutcome::Ignored);
        }

        let errors: Vec<FieldError> = Field::ALL
            .into_iter()
            .filter_map(|field| self.values.check(field).err())
            .collect();
        if !errors.is_empty() {
            for error in &errors {
                self.markers.insert(error.field(), Marker::Invalid(*error));
            }
            self.notice = Some(Notice {
                kind: NoticeKind::Error,
                text: AGGREGATE_ERROR_NOTICE,
            });
            self.notice_until = None;
            return Ok(SubmitOutcome::Rejected(errors));
        }

        let message = self.values.clone().into_message(at);
        let count = FeedbackLog::append(store, message.clone())?;
        info!("collected feedback message {}, {count} in total", message.id);

        self.values = FormValues::default();
        self.markers.clear();
        self.notice = Some(Notice {
            kind: NoticeKind::Success,
            text: SUCCESS_NOTICE,
        });
        self.notice_until = Some(now + self.notice_dismiss_delay);
        self.state = SubmitState::Submitting;
        self.cooldown_until = Some(now + self.resubmit_cooldown);
        Ok(SubmitOutcome::Accepted(message))
    }
}
