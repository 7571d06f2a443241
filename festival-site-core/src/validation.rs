use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^1[3-9][0-9]{9}$").unwrap());
static WECHAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z][-_a-zA-Z0-9]{5,19}$").unwrap());

/// The fields of the feedback form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Wechat,
    Subject,
    Message,
    Privacy,
}

impl Field {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Wechat,
        Self::Subject,
        Self::Message,
        Self::Privacy,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Wechat => "wechat",
            Self::Subject => "subject",
            Self::Message => "message",
            Self::Privacy => "privacy",
        }
    }

    /// Required fields get a valid marker as soon as they pass, optional fields
    /// only once they hold a value.
    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Phone | Self::Wechat)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown form field")]
pub struct UnknownField;

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or(UnknownField)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("姓名为必填项！")]
    NameRequired,
    #[error("姓名至少需要2个字符！")]
    NameTooShort,
    #[error("姓名不能超过20个字符！")]
    NameTooLong,
    #[error("邮箱为必填项！")]
    EmailRequired,
    #[error("请输入有效的邮箱地址！")]
    EmailInvalid,
    #[error("请输入有效的手机号码！")]
    PhoneInvalid,
    #[error("请输入有效的微信号！")]
    WechatInvalid,
    #[error("请选择留言主题！")]
    SubjectRequired,
    #[error("留言内容为必填项！")]
    MessageRequired,
    #[error("留言内容至少需要10个字符！")]
    MessageTooShort,
    #[error("留言内容不能超过500个字符！")]
    MessageTooLong,
    #[error("请阅读并同意隐私政策！")]
    PrivacyNotAccepted,
}

impl FieldError {
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::NameRequired | Self::NameTooShort | Self::NameTooLong => Field::Name,
            Self::EmailRequired | Self::EmailInvalid => Field::Email,
            Self::PhoneInvalid => Field::Phone,
            Self::WechatInvalid => Field::Wechat,
            Self::SubjectRequired => Field::Subject,
            Self::MessageRequired | Self::MessageTooShort | Self::MessageTooLong => Field::Message,
            Self::PrivacyNotAccepted => Field::Privacy,
        }
    }
}

/// Checks one field. `consent` only matters for [`Field::Privacy`], whose text
/// value is ignored.
pub fn validate(field: Field, raw: &str, consent: bool) -> Result<(), FieldError> {
    let value = raw.trim();
    let length = value.chars().count();
    match field {
        Field::Name => {
            if value.is_empty() {
                return Err(FieldError::NameRequired);
            }
            if length < 2 {
                return Err(FieldError::NameTooShort);
            }
            if length > 20 {
                return Err(FieldError::NameTooLong);
            }
        }
        Field::Email => {
            if value.is_empty() {
                return Err(FieldError::EmailRequired);
            }
            if !EMAIL.is_match(value) {
                return Err(FieldError::EmailInvalid);
            }
        }
        Field::Phone => {
            if !value.is_empty() && !PHONE.is_match(value) {
                return Err(FieldError::PhoneInvalid);
            }
        }
        Field::Wechat => {
            if !value.is_empty() && !WECHAT.is_match(value) {
                return Err(FieldError::WechatInvalid);
            }
        }
        Field::Subject => {
            if value.is_empty() {
                return Err(FieldError::SubjectRequired);
            }
        }
        Field::Message => {
            if value.is_empty() {
                return Err(FieldError::MessageRequired);
            }
            if length < 10 {
                return Err(FieldError::MessageTooShort);
            }
            if length > 500 {
                return Err(FieldError::MessageTooLong);
            }
        }
        Field::Privacy => {
            if !consent {
                return Err(FieldError::PrivacyNotAccepted);
            }
        }
    }
    Ok(())
}

/// Like [`validate`] but keyed by the form field name. Unknown names never fail.
#[must_use]
pub fn validate_named(name: &str, raw: &str, consent: bool) -> Option<FieldError> {
    let field = name.parse::<Field>().ok()?;
    validate(field, raw, consent).err()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(field: Field, raw: &str) -> Option<FieldError> {
        validate(field, raw, false).err()
    }

    #[test]
    fn name_length_bounds() {
        assert_eq!(check(Field::Name, ""), Some(FieldError::NameRequired));
        assert_eq!(check(Field::Name, "   "), Some(FieldError::NameRequired));
        assert_eq!(check(Field::Name, "王"), Some(FieldError::NameTooShort));
        assert_eq!(check(Field::Name, "王五"), None);
        assert_eq!(check(Field::Name, &"a".repeat(20)), None);
        assert_eq!(check(Field::Name, &"a".repeat(21)), Some(FieldError::NameTooLong));
        assert_eq!(check(Field::Name, " a "), Some(FieldError::NameTooShort));
    }

    #[test]
    fn email_shape() {
        assert_eq!(check(Field::Email, "a@b.c"), None);
        assert_eq!(check(Field::Email, " a@b.c "), None);
        assert_eq!(check(Field::Email, "a@b"), Some(FieldError::EmailInvalid));
        assert_eq!(check(Field::Email, "@b.c"), Some(FieldError::EmailInvalid));
        assert_eq!(check(Field::Email, "a b@c.d"), Some(FieldError::EmailInvalid));
        assert_eq!(check(Field::Email, "a@@b.c"), Some(FieldError::EmailInvalid));
        assert_eq!(check(Field::Email, ""), Some(FieldError::EmailRequired));
    }

    #[test]
    fn phone_is_optional_mobile_number() {
        assert_eq!(check(Field::Phone, ""), None);
        assert_eq!(check(Field::Phone, "13912345678"), None);
        assert_eq!(check(Field::Phone, "12345678901"), Some(FieldError::PhoneInvalid));
        assert_eq!(check(Field::Phone, "1391234567"), Some(FieldError::PhoneInvalid));
        assert_eq!(check(Field::Phone, "139123456789"), Some(FieldError::PhoneInvalid));
        // full-width digits are not accepted
        assert_eq!(check(Field::Phone, "1３912345678"), Some(FieldError::PhoneInvalid));
    }

    #[test]
    fn wechat_format() {
        assert_eq!(check(Field::Wechat, ""), None);
        assert_eq!(check(Field::Wechat, "abc_12-x"), None);
        assert_eq!(check(Field::Wechat, "abcde"), Some(FieldError::WechatInvalid));
        assert_eq!(check(Field::Wechat, "1abcdef"), Some(FieldError::WechatInvalid));
        assert_eq!(check(Field::Wechat, &format!("a{}", "b".repeat(19))), None);
        assert_eq!(
            check(Field::Wechat, &format!("a{}", "b".repeat(20))),
            Some(FieldError::WechatInvalid)
        );
    }

    #[test]
    fn subject_and_message() {
        assert_eq!(check(Field::Subject, ""), Some(FieldError::SubjectRequired));
        assert_eq!(check(Field::Subject, "建议"), None);
        assert_eq!(check(Field::Message, ""), Some(FieldError::MessageRequired));
        assert_eq!(check(Field::Message, "九个字九个字九个字"), Some(FieldError::MessageTooShort));
        assert_eq!(check(Field::Message, "十个字十个字十个字十"), None);
        assert_eq!(check(Field::Message, &"字".repeat(500)), None);
        assert_eq!(check(Field::Message, &"字".repeat(501)), Some(FieldError::MessageTooLong));
    }

    #[test]
    fn privacy_follows_consent() {
        assert_eq!(validate(Field::Privacy, "", false), Err(FieldError::PrivacyNotAccepted));
        assert_eq!(validate(Field::Privacy, "", true), Ok(()));
    }

    #[test]
    fn named_lookup() {
        assert_eq!(validate_named("phone", "123", false), Some(FieldError::PhoneInvalid));
        assert_eq!(validate_named("nickname", "", false), None);
        assert_eq!("message".parse::<Field>(), Ok(Field::Message));
        assert_eq!(FieldError::MessageTooShort.field(), Field::Message);
        assert_eq!(FieldError::EmailInvalid.to_string(), "请输入有效的邮箱地址！");
    }
}
