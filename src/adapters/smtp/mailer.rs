use crate::config::SmtpConfig;
use crate::domain::notification::OutgoingMail;
use crate::ports::mailer::{Mailer as MailerTrait, Result};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

/// OutgoingMailをlettreのMessageに変換する
///
/// 受信者アドレスはここで初めて検証され、不正な場合は配信失敗として扱われる。
fn build_message(mail: &OutgoingMail) -> Result<Message> {
    let mut builder = Message::builder()
        .from(mail.from.as_str().parse::<Mailbox>()?)
        .subject(mail.subject.as_str())
        .header(ContentType::TEXT_PLAIN);

    for recipient in &mail.to {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }

    Ok(builder.body(mail.body.clone())?)
}

/// MailerのSMTP実装
///
/// 設定されたリレーサーバーへ非同期に送信する。
/// 送信はサーバーが受理するまで待ち、失敗はすべてエラーとして返す。
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    pub fn new(config: &SmtpConfig) -> Self {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
                .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Self {
            transport: builder.build(),
        }
    }
}

#[async_trait]
impl MailerTrait for Mailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        let message = build_message(mail)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;

    fn mail_to(recipient: &str) -> OutgoingMail {
        OutgoingMail {
            subject: "Book Loaned Successfully".to_string(),
            body: "Hello alice".to_string(),
            from: EmailAddress::parse("library@example.com").unwrap(),
            to: vec![recipient.to_string()],
        }
    }

    #[test]
    fn test_build_message_sets_headers() {
        let message = build_message(&mail_to("a@x.com")).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("From: library@example.com"));
        assert!(formatted.contains("To: a@x.com"));
        assert!(formatted.contains("Subject: Book Loaned Successfully"));
        assert!(formatted.contains("Hello alice"));
    }

    #[test]
    fn test_build_message_rejects_invalid_recipient() {
        assert!(build_message(&mail_to("not-an-address")).is_err());
    }

    #[test]
    fn test_build_message_rejects_missing_recipient() {
        let mut mail = mail_to("a@x.com");
        mail.to.clear();
        assert!(build_message(&mail).is_err());
    }
}
