use crate::domain::notification::OutgoingMail;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// メール配信ポート
///
/// 配信は常に fail-loudly：配信に失敗した場合は必ずエラーを返す。
/// 失敗を握りつぶすモードは提供しない。
#[async_trait]
pub trait Mailer: Send + Sync {
    /// メールを送信し、配信が完了するまで待つ
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}
