/*
 * Responsibility
 * - users テーブル向け SQLx 読み取り (認証に必要な列のみ)
 * - PgPool を受け取り、email で 1 件引く
 * - DB エラーは RepoError に変換して返す
 */
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct UserCredentialRow {
    pub email: String,
    pub role: String,
    pub password: String,
}

pub async fn find_by_email(
    db: &PgPool,
    email: &str,
) -> Result<Option<UserCredentialRow>, RepoError> {
    let row = sqlx::query_as::<_, UserCredentialRow>(
        r#"
        SELECT email, role, password
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
