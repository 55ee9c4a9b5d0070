// SPDX-FileCopyrightText: 2026 HanGo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state rows in `chat_summaries`.

use hango_core::{HangoError, ThreadRecord};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

/// Encoded state for a thread owned by `user_id`.
///
/// A thread that exists under a different user reads as absent.
pub async fn get_thread_state(
    db: &Database,
    thread_id: &str,
    user_id: &str,
) -> Result<Option<String>, HangoError> {
    let thread_id = thread_id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT summary FROM chat_summaries WHERE thread_id = ?1 AND user_id = ?2",
                params![thread_id, user_id],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a row, or overwrite state, count and timestamp of an existing one.
///
/// `user_id` and `ai_friend_id` are only written by the first insert.
pub async fn upsert_thread_state(db: &Database, record: &ThreadRecord) -> Result<(), HangoError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO chat_summaries
                     (thread_id, user_id, ai_friend_id, summary, summarized_message_count, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(thread_id) DO UPDATE SET
                     summary = excluded.summary,
                     summarized_message_count = excluded.summarized_message_count,
                     updated_at = excluded.updated_at",
                params![
                    record.thread_id,
                    record.user_id,
                    record.persona_id,
                    record.encoded_state,
                    record.message_count,
                    record.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Full row for a thread, regardless of owner.
pub async fn get_thread_record(
    db: &Database,
    thread_id: &str,
) -> Result<Option<ThreadRecord>, HangoError> {
    let thread_id = thread_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT thread_id, user_id, ai_friend_id, summary, summarized_message_count, updated_at
                 FROM chat_summaries WHERE thread_id = ?1",
                params![thread_id],
                |row| {
                    Ok(ThreadRecord {
                        thread_id: row.get(0)?,
                        user_id: row.get(1)?,
                        persona_id: row.get(2)?,
                        encoded_state: row.get(3)?,
                        message_count: row.get(4)?,
                        updated_at: row.get(5)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Number of stored threads.
pub async fn count_threads(db: &Database) -> Result<i64, HangoError> {
    db.connection()
        .call(|conn| conn.query_row("SELECT COUNT(*) FROM chat_summaries", [], |row| row.get(0)))
        .await
        .map_err(map_tr_err)
}
