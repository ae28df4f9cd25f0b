use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 貸出ID - 貸出レコードの主キー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanId(i64);

impl LoanId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 会員ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(i64);

impl MemberId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// ユーザーID - 会員が参照する認証ユーザー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// 書籍ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(i64);

impl BookId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// メールアドレスのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailAddressError {
    /// 空文字列
    #[error("Email address is empty")]
    Empty,
    /// `local@domain` 形式ではない
    #[error("Malformed email address: {0}")]
    Malformed(String),
}

/// 送信元メールアドレス
///
/// 設定値から生成されるため、生成時に最低限の形式チェックを行う。
/// 受信者側のアドレスはストレージの値をそのまま使い、検証はメール配信側に任せる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(value: impl Into<String>) -> Result<Self, EmailAddressError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EmailAddressError::Empty);
        }

        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(EmailAddressError::Malformed(trimmed.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_id_value() {
        let id = LoanId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn test_loan_id_ordering() {
        assert!(LoanId::new(1) < LoanId::new(2));
    }

    #[test]
    fn test_email_address_parse_valid() {
        let address = EmailAddress::parse("library@example.com").unwrap();
        assert_eq!(address.as_str(), "library@example.com");
    }

    #[test]
    fn test_email_address_parse_trims_whitespace() {
        let address = EmailAddress::parse("  library@example.com \n").unwrap();
        assert_eq!(address.as_str(), "library@example.com");
    }

    #[test]
    fn test_email_address_parse_empty() {
        assert_eq!(EmailAddress::parse("   "), Err(EmailAddressError::Empty));
    }

    #[test]
    fn test_email_address_parse_malformed() {
        assert!(matches!(
            EmailAddress::parse("library"),
            Err(EmailAddressError::Malformed(_))
        ));
        assert!(matches!(
            EmailAddress::parse("@example.com"),
            Err(EmailAddressError::Malformed(_))
        ));
        assert!(matches!(
            EmailAddress::parse("library@"),
            Err(EmailAddressError::Malformed(_))
        ));
        assert!(matches!(
            EmailAddress::parse("a@b@c"),
            Err(EmailAddressError::Malformed(_))
        ));
    }
}
