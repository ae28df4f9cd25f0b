use crate::domain::LoanId;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::pin::Pin;
use std::str::FromStr;
use tracing::{error, info, warn};

use super::errors::{NotificationError, Result};
use super::loan_notifier::{JobDependencies, NotifyOutcome, notify_loan, send_loan_notification};

/// 延滞走査の冒頭で行う空チェックの向き
///
/// `Legacy` は既存ジョブの挙動をそのまま再現する。
/// 延滞中の貸出が「ある」ときにスキップし、「ない」ときだけ先へ進むため、
/// 実際にはリマインドが一通も送信されない。
/// `Corrected` は延滞中の貸出がないときだけスキップする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepGuard {
    #[default]
    Legacy,
    Corrected,
}

impl SweepGuard {
    /// 走査をスキップするか判定する
    pub fn should_skip(self, has_overdue: bool) -> bool {
        match self {
            SweepGuard::Legacy => has_overdue,
            SweepGuard::Corrected => !has_overdue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SweepGuard::Legacy => "legacy",
            SweepGuard::Corrected => "corrected",
        }
    }
}

impl FromStr for SweepGuard {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(SweepGuard::Legacy),
            "corrected" => Ok(SweepGuard::Corrected),
            other => Err(format!("Invalid sweep guard: {}", other)),
        }
    }
}

/// 延滞走査1回分の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// 空チェックで走査をスキップした
    pub skipped: bool,
    /// 本走査で送信を試みた件数
    pub attempted: usize,
    /// 本走査で配信に成功した件数
    pub delivered: usize,
    /// 再送した貸出ID（本走査で失敗したもの）
    pub retried: Vec<LoanId>,
    /// 再送で配信に成功した件数
    pub retry_delivered: usize,
}

impl SweepReport {
    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// 延滞リマインドの走査（バッチ）
///
/// 定期的に実行され、延滞中の貸出の会員へメールを送信する。
///
/// 処理フロー：
/// 1. 延滞中の貸出（未返却かつ due_date < now）のストリームを開く
/// 2. 先頭を覗いて空かどうかを判定し、`SweepGuard` に従ってスキップ判定
/// 3. 同じストリームを1件ずつ処理し、メールを送信
///    - 配信失敗はログに記録して貸出IDを控え、次の貸出へ進む
/// 4. 控えた貸出IDごとに `notify_loan` を1回だけ再実行
///
/// 空チェックと本走査は同一の結果セットを対象とする。
/// 処理はすべて逐次実行で、並列送信は行わない。
///
/// # エラー
/// - LoanRepositoryError: 延滞貸出の取得に失敗（走査を中断）。
///   それまでに控えた配信失敗の貸出は再送されない
/// - RetryPassFailed: 再送パスで配信に失敗（すべての再送を試行した後に返す）
#[tracing::instrument(skip(deps), fields(guard = deps.sweep_guard.as_str()))]
pub async fn sweep_overdue_loans(deps: &JobDependencies, now: DateTime<Utc>) -> Result<SweepReport> {
    // 1. 延滞中の貸出のストリーム
    let mut loans = deps.loan_repository.stream_overdue(now).peekable();

    // 2. スキップ判定（先頭行の読み出し失敗はスキップせずにエラーとする）
    let first_is_ok = Pin::new(&mut loans).peek().await.map(|loan| loan.is_ok());
    if first_is_ok == Some(false) {
        if let Some(Err(e)) = loans.next().await {
            return Err(NotificationError::LoanRepositoryError(e));
        }
    }
    let has_overdue = first_is_ok.is_some();
    if deps.sweep_guard.should_skip(has_overdue) {
        info!("No pending loaned books");
        return Ok(SweepReport::skipped());
    }

    let total = deps
        .loan_repository
        .count_overdue(now)
        .await
        .map_err(NotificationError::LoanRepositoryError)?;
    info!(total, "Total pending loans");

    // 3. 本走査
    let mut report = SweepReport::default();
    let mut failed_loan_ids = Vec::new();

    while let Some(loan) = loans.next().await {
        let loan = loan.map_err(NotificationError::LoanRepositoryError)?;
        report.attempted += 1;

        info!(
            loan_id = %loan.loan_id,
            email = %loan.member_email(),
            title = %loan.book_title(),
            "Sending overdue reminder"
        );

        match send_loan_notification(deps, &loan).await {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                error!(
                    loan_id = %loan.loan_id,
                    email = %loan.member_email(),
                    error = %e,
                    "Failed to send overdue reminder"
                );
                failed_loan_ids.push(loan.loan_id);
            }
        }
    }
    // 再送前にストリームのコネクションを解放する
    drop(loans);

    // 4. 再送パス
    let mut retry_failures = Vec::new();
    let mut first_error = None;

    for loan_id in failed_loan_ids {
        info!(loan_id = %loan_id, "Retrying loan notification");
        report.retried.push(loan_id);

        match notify_loan(deps, loan_id).await {
            Ok(NotifyOutcome::Sent) => report.retry_delivered += 1,
            Ok(NotifyOutcome::LoanNotFound) => {
                warn!(loan_id = %loan_id, "Loan disappeared before retry");
            }
            Err(e) => {
                retry_failures.push(loan_id);
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(source) = first_error {
        return Err(NotificationError::RetryPassFailed {
            failed_loan_ids: retry_failures,
            source: Box::new(source),
        });
    }

    Ok(report)
}
