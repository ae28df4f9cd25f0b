use crate::domain::{
    loan::{Book, Loan, Member, User},
    value_objects::{BookId, LoanId, MemberId, UserId},
};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{StreamExt, stream::BoxStream};
use sqlx::{PgPool, Row, postgres::PgRow};

/// PostgreSQLの行データをLoanに変換する
///
/// 貸出・会員・ユーザー・書籍を結合したSELECTの結果を前提とする。
fn map_row_to_loan(row: &PgRow) -> Result<Loan> {
    Ok(Loan {
        loan_id: LoanId::new(row.try_get("loan_id")?),
        member: Member {
            member_id: MemberId::new(row.try_get("member_id")?),
            user: User {
                user_id: UserId::new(row.try_get("user_id")?),
                username: row.try_get("username")?,
                email: row.try_get("email")?,
            },
        },
        book: Book {
            book_id: BookId::new(row.try_get("book_id")?),
            title: row.try_get("title")?,
        },
        due_date: row.try_get("due_date")?,
        is_returned: row.try_get("is_returned")?,
    })
}

/// LoanRepositoryのPostgreSQL実装
///
/// `library_loan` を起点に `library_member`、`auth_user`、`library_book` を
/// 結合して1回のクエリで取得する（行ごとの追加クエリは発行しない）。
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    /// PostgreSQLコネクションプールから新しいLoanRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    /// IDで貸出を取得
    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        let row = sqlx::query(
            r#"
            SELECT
                l.id AS loan_id,
                l.due_date,
                l.is_returned,
                m.id AS member_id,
                u.id AS user_id,
                u.username,
                u.email,
                b.id AS book_id,
                b.title
            FROM library_loan l
            JOIN library_member m ON m.id = l.member_id
            JOIN auth_user u ON u.id = m.user_id
            JOIN library_book b ON b.id = l.book_id
            WHERE l.id = $1
            "#,
        )
        .bind(loan_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan).transpose()
    }

    async fn count_overdue(&self, now: DateTime<Utc>) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM library_loan
            WHERE is_returned = FALSE AND due_date < $1
            "#,
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(count)?)
    }

    /// 延滞中の貸出をストリーム配信
    ///
    /// 未返却の貸出に限定した due_date の部分インデックスを使用する。
    /// 行はコネクションから1件ずつ読み出される。
    fn stream_overdue(&self, now: DateTime<Utc>) -> BoxStream<'_, Result<Loan>> {
        let stream = sqlx::query(
            r#"
            SELECT
                l.id AS loan_id,
                l.due_date,
                l.is_returned,
                m.id AS member_id,
                u.id AS user_id,
                u.username,
                u.email,
                b.id AS book_id,
                b.title
            FROM library_loan l
            JOIN library_member m ON m.id = l.member_id
            JOIN auth_user u ON u.id = m.user_id
            JOIN library_book b ON b.id = l.book_id
            WHERE l.is_returned = FALSE AND l.due_date < $1
            ORDER BY l.due_date ASC, l.id ASC
            "#,
        )
        .bind(now)
        .fetch(&self.pool)
        .map(|row_result| -> Result<Loan> {
            let row = row_result?;
            map_row_to_loan(&row)
        });

        Box::pin(stream)
    }
}
