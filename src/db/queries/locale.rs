use sqlx::{PgConnection, PgPool};

use crate::db::models::ChatLocale;

pub async fn get(pool: &PgPool, chat_id: i64) -> Result<Option<ChatLocale>, sqlx::Error> {
    sqlx::query_as::<_, ChatLocale>(
        "SELECT chat_id, locale, updated_at FROM chat_locales WHERE chat_id = $1"
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await
}

pub async fn set(pool: &PgPool, chat_id: i64, locale: &str) -> Result<ChatLocale, sqlx::Error> {
    sqlx::query_as::<_, ChatLocale>(
        r#"
        INSERT INTO chat_locales (chat_id, locale)
        VALUES ($1, $2)
        ON CONFLICT (chat_id)
        DO UPDATE SET locale = EXCLUDED.locale, updated_at = NOW()
        RETURNING chat_id, locale, updated_at
        "#
    )
    .bind(chat_id)
    .bind(locale)
    .fetch_one(pool)
    .await
}

pub async fn migrate(
    conn: &mut PgConnection,
    old_chat_id: i64,
    new_chat_id: i64,
) -> Result<(), sqlx::Error> {
    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT chat_id FROM chat_locales WHERE chat_id = $1 FOR UPDATE"
    )
    .bind(old_chat_id)
    .fetch_optional(&mut *conn)
    .await?;

    if existing.is_none() {
        return Ok(());
    }

    sqlx::query("DELETE FROM chat_locales WHERE chat_id = $1")
        .bind(new_chat_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "UPDATE chat_locales SET chat_id = $2, updated_at = NOW() WHERE chat_id = $1"
    )
    .bind(old_chat_id)
    .bind(new_chat_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
