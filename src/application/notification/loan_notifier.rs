use crate::domain::{
    EmailAddress, LoanId,
    loan::Loan,
    notification::loan_notification,
};
use crate::ports::*;
use std::sync::Arc;
use tracing::{debug, info};

use super::errors::{NotificationError, Result};
use super::overdue_sweep::SweepGuard;

/// ジョブの依存関係
///
/// 振る舞いは持たず、各ジョブ関数に引数として渡す。
/// ワーカーへ渡すため `Clone` を実装する。
#[derive(Clone)]
pub struct JobDependencies {
    pub loan_repository: Arc<dyn LoanRepository>,
    pub mailer: Arc<dyn Mailer>,
    /// 送信元アドレス
    pub from_email: EmailAddress,
    /// 延滞走査の空チェックの向き
    pub sweep_guard: SweepGuard,
}

/// 貸出通知の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// メールを1通送信した
    Sent,
    /// 貸出が存在しなかったため何もしなかった
    LoanNotFound,
}

/// 貸出通知メールを1通送信する
///
/// 配信エラーはそのまま `DeliveryFailed` として返す。
/// `notify_loan` と延滞走査の両方から使われる。
pub(super) async fn send_loan_notification(deps: &JobDependencies, loan: &Loan) -> Result<()> {
    let mail = loan_notification(loan, &deps.from_email);

    deps.mailer
        .send(&mail)
        .await
        .map_err(|source| NotificationError::DeliveryFailed {
            loan_id: loan.loan_id,
            source,
        })
}

/// 貸出確認メールを送信する
///
/// 処理フロー：
/// 1. IDで貸出を取得する
/// 2. 存在しなければ何もせずに正常終了する（エラーではない）
/// 3. 会員のメールアドレス宛に確認メールを送信する
///
/// # エラー
/// - LoanRepositoryError: 貸出の取得に失敗
/// - DeliveryFailed: メール配信に失敗
#[tracing::instrument(skip(deps), fields(loan_id = %loan_id))]
pub async fn notify_loan(deps: &JobDependencies, loan_id: LoanId) -> Result<NotifyOutcome> {
    let loan = deps
        .loan_repository
        .get_by_id(loan_id)
        .await
        .map_err(NotificationError::LoanRepositoryError)?;

    let Some(loan) = loan else {
        debug!("Loan not found, skipping notification");
        return Ok(NotifyOutcome::LoanNotFound);
    };

    send_loan_notification(deps, &loan).await?;

    info!(
        email = %loan.member_email(),
        title = %loan.book_title(),
        "Sent loan notification"
    );

    Ok(NotifyOutcome::Sent)
}
