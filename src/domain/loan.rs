use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookId, LoanId, MemberId, UserId};

/// 認証ユーザー
///
/// 会員の連絡先（メールアドレス）と表示名を保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    /// ストレージに保存されている値そのまま（未検証）
    pub email: String,
}

/// 会員
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub user: User,
}

/// 書籍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub book_id: BookId,
    pub title: String,
}

/// 貸出
///
/// 会員・ユーザー・書籍を結合済みの読み取り専用ビュー。
/// 貸出の作成・返却処理は別のコンテキストが担い、ここでは参照のみ行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub member: Member,
    pub book: Book,
    pub due_date: DateTime<Utc>,
    pub is_returned: bool,
}

impl Loan {
    /// 通知先のメールアドレス
    pub fn member_email(&self) -> &str {
        &self.member.user.email
    }

    /// 通知本文で使う表示名
    pub fn member_name(&self) -> &str {
        &self.member.user.username
    }

    pub fn book_title(&self) -> &str {
        &self.book.title
    }
}

/// 延滞判定（純粋関数）
///
/// 未返却かつ返却期限が `now` より前の場合のみ延滞とする。
/// 返却期限ちょうどの時刻はまだ延滞ではない。
pub fn is_overdue(loan: &Loan, now: DateTime<Utc>) -> bool {
    !loan.is_returned && loan.due_date < now
}
