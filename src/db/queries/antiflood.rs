use sqlx::{PgConnection, PgPool};

use crate::db::models::FloodRecord;

pub async fn get(pool: &PgPool, chat_id: i64) -> Result<Option<FloodRecord>, sqlx::Error> {
    sqlx::query_as::<_, FloodRecord>(
        r#"
        SELECT chat_id, flood_limit, last_user_id, consecutive_count, updated_at
        FROM antiflood
        WHERE chat_id = $1
        "#
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await
}

pub async fn get_limit(pool: &PgPool, chat_id: i64) -> Result<Option<i32>, sqlx::Error> {
    let result: Option<(i32,)> = sqlx::query_as(
        "SELECT flood_limit FROM antiflood WHERE chat_id = $1"
    )
    .bind(chat_id)
    .fetch_optional(pool)
    .await?;

    Ok(result.map(|r| r.0))
}

/// Set the limit, creating the row if needed. The running streak is cleared.
pub async fn set_limit(
    pool: &PgPool,
    chat_id: i64,
    limit: i32,
) -> Result<FloodRecord, sqlx::Error> {
    sqlx::query_as::<_, FloodRecord>(
        r#"
        INSERT INTO antiflood (chat_id, flood_limit)
        VALUES ($1, $2)
        ON CONFLICT (chat_id)
        DO UPDATE SET
            flood_limit = EXCLUDED.flood_limit,
            last_user_id = NULL,
            consecutive_count = 0,
            updated_at = NOW()
        RETURNING chat_id, flood_limit, last_user_id, consecutive_count, updated_at
        "#
    )
    .bind(chat_id)
    .bind(limit)
    .fetch_one(pool)
    .await
}

/// Fetch the row for update inside a transaction, creating it if missing
pub async fn lock_or_create(
    conn: &mut PgConnection,
    chat_id: i64,
) -> Result<FloodRecord, sqlx::Error> {
    sqlx::query(
        "INSERT INTO antiflood (chat_id) VALUES ($1) ON CONFLICT (chat_id) DO NOTHING"
    )
    .bind(chat_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query_as::<_, FloodRecord>(
        r#"
        SELECT chat_id, flood_limit, last_user_id, consecutive_count, updated_at
        FROM antiflood
        WHERE chat_id = $1
        FOR UPDATE
        "#
    )
    .bind(chat_id)
    .fetch_one(&mut *conn)
    .await
}

pub async fn save_counter(
    conn: &mut PgConnection,
    record: &FloodRecord,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE antiflood
        SET last_user_id = $2, consecutive_count = $3, updated_at = NOW()
        WHERE chat_id = $1
        "#
    )
    .bind(record.chat_id)
    .bind(record.last_user_id)
    .bind(record.consecutive_count)
    .execute(conn)
    .await?;

    Ok(())
}

/// Re-key a chat's row. Returns false when the old id had no row.
pub async fn migrate(
    conn: &mut PgConnection,
    old_chat_id: i64,
    new_chat_id: i64,
) -> Result<bool, sqlx::Error> {
    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT chat_id FROM antiflood WHERE chat_id = $1 FOR UPDATE"
    )
    .bind(old_chat_id)
    .fetch_optional(&mut *conn)
    .await?;

    if existing.is_none() {
        return Ok(false);
    }

    sqlx::query("DELETE FROM antiflood WHERE chat_id = $1")
        .bind(new_chat_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "UPDATE antiflood SET chat_id = $2, updated_at = NOW() WHERE chat_id = $1"
    )
    .bind(old_chat_id)
    .bind(new_chat_id)
    .execute(&mut *conn)
    .await?;

    Ok(true)
}
