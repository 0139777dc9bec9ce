// SPDX-FileCopyrightText: 2026 TaskQuest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task CRUD and scan queries.

use chrono::{DateTime, Utc};
use rusqlite::{Row, params};
use taskquest_core::types::{Reminder, SortField, SortOrder, Task, TaskQuery};
use taskquest_core::TaskQuestError;

use crate::codec::{get_enum, get_json, get_opt_ts, get_ts, json_list, opt_ts, ts};
use crate::database::{Database, map_tr_err};

const TASK_COLUMNS: &str = "id, user_id, title, description, labels, tags, difficulty, status, \
     priority, xp_value, due_date, xp_awarded, completed_at, reminder_enabled, \
     reminder_datetime, reminder_sent, overdue_notification_sent, created_at, updated_at";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        labels: get_json(row, 4)?,
        tags: get_json(row, 5)?,
        difficulty: get_enum(row, 6)?,
        status: get_enum(row, 7)?,
        priority: get_enum(row, 8)?,
        xp_value: row.get(9)?,
        due_date: get_opt_ts(row, 10)?,
        xp_awarded: row.get(11)?,
        completed_at: get_opt_ts(row, 12)?,
        reminder: Reminder {
            enabled: row.get(13)?,
            datetime: get_opt_ts(row, 14)?,
            sent: row.get(15)?,
        },
        overdue_notification_sent: row.get(16)?,
        created_at: get_ts(row, 17)?,
        updated_at: get_ts(row, 18)?,
    })
}

fn query_tasks(
    conn: &rusqlite::Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<Task>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, task_from_row)?;
    rows.collect()
}

fn order_clause(field: SortField, order: SortOrder) -> String {
    let column = match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::DueDate => "due_date",
        SortField::Title => "title COLLATE NOCASE",
        SortField::Status => {
            "CASE status WHEN 'todo' THEN 0 WHEN 'in-progress' THEN 1 ELSE 2 END"
        }
        SortField::Priority => "CASE priority WHEN 'low' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END",
    };
    let dir = match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!("{column} {dir}, id {dir}")
}

/// Insert a new task.
pub async fn insert_task(db: &Database, task: &Task) -> Result<(), TaskQuestError> {
    let task = task.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                &format!(
                    "INSERT INTO tasks ({TASK_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                             ?16, ?17, ?18, ?19)"
                ),
                params![
                    task.id,
                    task.user_id,
                    task.title,
                    task.description,
                    json_list(&task.labels),
                    json_list(&task.tags),
                    task.difficulty.to_string(),
                    task.status.to_string(),
                    task.priority.to_string(),
                    task.xp_value,
                    opt_ts(task.due_date),
                    task.xp_awarded,
                    opt_ts(task.completed_at),
                    task.reminder.enabled,
                    opt_ts(task.reminder.datetime),
                    task.reminder.sent,
                    task.overdue_notification_sent,
                    ts(task.created_at),
                    ts(task.updated_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a task by ID regardless of owner.
pub async fn get_task(db: &Database, id: &str) -> Result<Option<Task>, TaskQuestError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                task_from_row,
            );
            match result {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Get a task by ID, only if owned by `user_id`.
pub async fn get_task_for_user(
    db: &Database,
    user_id: &str,
    id: &str,
) -> Result<Option<Task>, TaskQuestError> {
    let id = id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND user_id = ?2"),
                params![id, user_id],
                task_from_row,
            );
            match result {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// One page of a user's tasks.
pub async fn list_tasks(
    db: &Database,
    user_id: &str,
    query: &TaskQuery,
) -> Result<Vec<Task>, TaskQuestError> {
    let user_id = user_id.to_string();
    let sql = format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?1 ORDER BY {} LIMIT ?2 OFFSET ?3",
        order_clause(query.sort.field, query.sort.order)
    );
    let limit = query.limit;
    let offset = query.offset();
    db.connection()
        .call(move |conn| query_tasks(conn, &sql, params![user_id, limit, offset]))
        .await
        .map_err(map_tr_err)
}

pub async fn count_tasks(db: &Database, user_id: &str) -> Result<u64, TaskQuestError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Write back an edited task.
///
/// `xp_awarded` can only go from 0 to 1 here and `overdue_notification_sent`
/// is not written at all. `reminder_sent` keeps its stored value unless the
/// reminder's `enabled`/`datetime` changed, so a concurrent reminder scan is
/// never undone by a stale read.
pub async fn update_task(db: &Database, task: &Task) -> Result<(), TaskQuestError> {
    let id = task.id.clone();
    let task = task.clone();
    let changed = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE tasks SET
                    title = ?1, description = ?2, labels = ?3, tags = ?4,
                    difficulty = ?5, status = ?6, priority = ?7, due_date = ?8,
                    completed_at = ?9,
                    reminder_sent = CASE
                        WHEN reminder_enabled = ?10 AND reminder_datetime IS ?11 THEN reminder_sent
                        ELSE ?12 END,
                    reminder_enabled = ?10, reminder_datetime = ?11,
                    xp_awarded = (xp_awarded OR ?13), updated_at = ?14
                 WHERE id = ?15 AND user_id = ?16",
                params![
                    task.title,
                    task.description,
                    json_list(&task.labels),
                    json_list(&task.tags),
                    task.difficulty.to_string(),
                    task.status.to_string(),
                    task.priority.to_string(),
                    opt_ts(task.due_date),
                    opt_ts(task.completed_at),
                    task.reminder.enabled,
                    opt_ts(task.reminder.datetime),
                    task.reminder.sent,
                    task.xp_awarded,
                    ts(task.updated_at),
                    task.id,
                    task.user_id,
                ],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if changed == 0 {
        return Err(TaskQuestError::task_not_found(id));
    }
    Ok(())
}

/// Delete a user's task. Returns whether a row was removed.
pub async fn delete_task(db: &Database, user_id: &str, id: &str) -> Result<bool, TaskQuestError> {
    let id = id.to_string();
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Reminders that should fire at `now`, oldest first.
pub async fn due_reminders(db: &Database, now: DateTime<Utc>) -> Result<Vec<Task>, TaskQuestError> {
    let now = ts(now);
    db.connection()
        .call(move |conn| {
            query_tasks(
                conn,
                &format!(
                    "SELECT {TASK_COLUMNS} FROM tasks
                     WHERE reminder_enabled = 1 AND reminder_sent = 0
                       AND reminder_datetime IS NOT NULL AND reminder_datetime <= ?1
                       AND status != 'completed'
                     ORDER BY reminder_datetime ASC, id ASC"
                ),
                params![now],
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Overdue tasks across all users that have not been notified, grouped by owner.
pub async fn overdue_unnotified(
    db: &Database,
    now: DateTime<Utc>,
) -> Result<Vec<Task>, TaskQuestError> {
    let now = ts(now);
    db.connection()
        .call(move |conn| {
            query_tasks(
                conn,
                &format!(
                    "SELECT {TASK_COLUMNS} FROM tasks
                     WHERE due_date IS NOT NULL AND due_date < ?1
                       AND status != 'completed' AND overdue_notification_sent = 0
                     ORDER BY user_id ASC, due_date ASC, id ASC"
                ),
                params![now],
            )
        })
        .await
        .map_err(map_tr_err)
}

/// One user's overdue tasks, oldest due date first.
pub async fn overdue_for_user(
    db: &Database,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Task>, TaskQuestError> {
    let user_id = user_id.to_string();
    let now = ts(now);
    db.connection()
        .call(move |conn| {
            query_tasks(
                conn,
                &format!(
                    "SELECT {TASK_COLUMNS} FROM tasks
                     WHERE user_id = ?1 AND due_date IS NOT NULL AND due_date < ?2
                       AND status != 'completed'
                     ORDER BY due_date ASC, id ASC"
                ),
                params![user_id, now],
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Flag the reminder scheduled for `at` as delivered.
///
/// Only an enabled, unsent reminder still set for `at` is flagged. Returns
/// false when the reminder was cancelled or rescheduled in the meantime.
pub async fn mark_reminder_sent(
    db: &Database,
    id: &str,
    at: DateTime<Utc>,
) -> Result<bool, TaskQuestError> {
    let id = id.to_string();
    let at = ts(at);
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE tasks SET reminder_sent = 1, updated_at = ?3
                 WHERE id = ?1 AND reminder_enabled = 1 AND reminder_sent = 0
                   AND reminder_datetime IS ?2",
                params![id, at, ts(Utc::now())],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite both reminder flags. Returns false when no such task exists.
pub async fn set_reminder_state(
    db: &Database,
    id: &str,
    enabled: bool,
    sent: bool,
) -> Result<bool, TaskQuestError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE tasks SET reminder_enabled = ?2, reminder_sent = ?3, updated_at = ?4
                 WHERE id = ?1",
                params![id, enabled, sent, ts(Utc::now())],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Flag every listed task as overdue-notified in one transaction.
pub async fn mark_overdue_notified(db: &Database, ids: &[String]) -> Result<(), TaskQuestError> {
    if ids.is_empty() {
        return Ok(());
    }
    let ids = ids.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "UPDATE tasks SET overdue_notification_sent = 1, updated_at = ?2 WHERE id = ?1",
                )?;
                let now = ts(Utc::now());
                for id in &ids {
                    stmt.execute(params![id, now])?;
                }
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use taskquest_core::types::{Priority, SortSpec, TaskStatus};
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_task(id: &str, user_id: &str) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: format!("task {id}"),
            description: None,
            labels: vec!["home".to_string()],
            tags: vec![],
            difficulty: Default::default(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            xp_value: 20,
            due_date: None,
            xp_awarded: false,
            completed_at: None,
            reminder: Reminder::default(),
            overdue_notification_sent: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn insert_and_get_task_roundtrips() {
        let (db, _dir) = setup_db().await;
        let mut task = make_task("t1", "u1");
        task.due_date = Some(Utc::now() + Duration::days(1));
        task.tags = vec!["urgent".to_string()];
        insert_task(&db, &task).await.unwrap();

        let loaded = get_task(&db, "t1").await.unwrap().unwrap();
        assert_eq!(loaded.title, "task t1");
        assert_eq!(loaded.labels, vec!["home"]);
        assert_eq!(loaded.tags, vec!["urgent"]);
        assert_eq!(loaded.priority, Priority::Medium);
        assert_eq!(loaded.xp_value, 20);
        assert!(loaded.due_date.is_some());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn ownership_filter_hides_other_users_tasks() {
        let (db, _dir) = setup_db().await;
        insert_task(&db, &make_task("t1", "alice")).await.unwrap();

        assert!(get_task_for_user(&db, "alice", "t1").await.unwrap().is_some());
        assert!(get_task_for_user(&db, "bob", "t1").await.unwrap().is_none());
        assert!(!delete_task(&db, "bob", "t1").await.unwrap());
        assert!(delete_task(&db, "alice", "t1").await.unwrap());
        assert!(get_task(&db, "t1").await.unwrap().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_tasks_sorts_and_paginates() {
        let (db, _dir) = setup_db().await;
        for (id, priority) in [("a", Priority::Low), ("b", Priority::High), ("c", Priority::Medium)] {
            let mut task = make_task(id, "u1");
            task.priority = priority;
            insert_task(&db, &task).await.unwrap();
        }
        insert_task(&db, &make_task("other", "u2")).await.unwrap();

        let query = TaskQuery::new("priority:desc".parse::<SortSpec>().unwrap(), Some(1), Some(2));
        let page = list_tasks(&db, "u1", &query).await.unwrap();
        let ids: Vec<&str> = page.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);

        let query = TaskQuery::new("priority:desc".parse::<SortSpec>().unwrap(), Some(2), Some(2));
        let page = list_tasks(&db, "u1", &query).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "a");

        assert_eq!(count_tasks(&db, "u1").await.unwrap(), 3);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_never_clears_award_or_overdue_flags() {
        let (db, _dir) = setup_db().await;
        let task = make_task("t1", "u1");
        insert_task(&db, &task).await.unwrap();
        db.connection()
            .call(|conn| {
                conn.execute(
                    "UPDATE tasks SET xp_awarded = 1, overdue_notification_sent = 1 WHERE id = 't1'",
                    [],
                )
            })
            .await
            .unwrap();

        let mut stale = task.clone();
        stale.title = "renamed".to_string();
        update_task(&db, &stale).await.unwrap();

        let loaded = get_task(&db, "t1").await.unwrap().unwrap();
        assert_eq!(loaded.title, "renamed");
        assert!(loaded.xp_awarded);
        assert!(loaded.overdue_notification_sent);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_preserves_sent_reminder_unless_rescheduled() {
        let (db, _dir) = setup_db().await;
        let at = Utc::now() - Duration::minutes(5);
        let mut task = make_task("t1", "u1");
        task.reminder = Reminder {
            enabled: true,
            datetime: Some(at),
            sent: false,
        };
        insert_task(&db, &task).await.unwrap();
        assert!(mark_reminder_sent(&db, "t1", at).await.unwrap());

        // Stale copy with sent = false and the same schedule.
        update_task(&db, &task).await.unwrap();
        assert!(get_task(&db, "t1").await.unwrap().unwrap().reminder.sent);

        // New schedule resets the flag to what the caller passes.
        task.reminder.datetime = Some(at + Duration::hours(1));
        update_task(&db, &task).await.unwrap();
        assert!(!get_task(&db, "t1").await.unwrap().unwrap().reminder.sent);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_sent_ignores_cancelled_or_rescheduled_reminder() {
        let (db, _dir) = setup_db().await;
        let at = Utc::now() - Duration::minutes(5);
        let mut task = make_task("t1", "u1");
        task.reminder = Reminder {
            enabled: true,
            datetime: Some(at),
            sent: false,
        };
        insert_task(&db, &task).await.unwrap();

        // Rescheduled after the old time was read.
        let moved = at + Duration::hours(2);
        task.reminder.datetime = Some(moved);
        update_task(&db, &task).await.unwrap();
        assert!(!mark_reminder_sent(&db, "t1", at).await.unwrap());
        let loaded = get_task(&db, "t1").await.unwrap().unwrap();
        assert!(!loaded.reminder.sent);
        assert_eq!(loaded.reminder.datetime, Some(moved));

        // Cancelled.
        set_reminder_state(&db, "t1", false, false).await.unwrap();
        assert!(!mark_reminder_sent(&db, "t1", moved).await.unwrap());
        assert!(!get_task(&db, "t1").await.unwrap().unwrap().reminder.sent);

        // Already sent.
        set_reminder_state(&db, "t1", true, false).await.unwrap();
        assert!(mark_reminder_sent(&db, "t1", moved).await.unwrap());
        assert!(!mark_reminder_sent(&db, "t1", moved).await.unwrap());
        assert!(!mark_reminder_sent(&db, "ghost", moved).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn update_missing_task_is_not_found() {
        let (db, _dir) = setup_db().await;
        let err = update_task(&db, &make_task("ghost", "u1")).await.unwrap_err();
        assert!(matches!(err, TaskQuestError::NotFound { .. }));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn due_reminders_filters_by_state_and_time() {
        let (db, _dir) = setup_db().await;
        let now = Utc::now();

        let mut due = make_task("due", "u1");
        due.reminder = Reminder { enabled: true, datetime: Some(now - Duration::minutes(1)), sent: false };
        let mut future = make_task("future", "u1");
        future.reminder = Reminder { enabled: true, datetime: Some(now + Duration::hours(1)), sent: false };
        let mut disabled = make_task("disabled", "u1");
        disabled.reminder = Reminder { enabled: false, datetime: Some(now - Duration::minutes(1)), sent: false };
        let mut done = make_task("done", "u1");
        done.status = TaskStatus::Completed;
        done.reminder = due.reminder.clone();
        for t in [&due, &future, &disabled, &done] {
            insert_task(&db, t).await.unwrap();
        }

        let found = due_reminders(&db, now).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "due");

        let at = now - Duration::minutes(1);
        assert!(mark_reminder_sent(&db, "due", at).await.unwrap());
        assert!(due_reminders(&db, now).await.unwrap().is_empty());

        assert!(set_reminder_state(&db, "due", true, false).await.unwrap());
        assert_eq!(due_reminders(&db, now).await.unwrap().len(), 1);
        assert!(!set_reminder_state(&db, "nope", false, false).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn overdue_queries_respect_flag_and_status() {
        let (db, _dir) = setup_db().await;
        let now = Utc::now();
        let mut late1 = make_task("late1", "u1");
        late1.due_date = Some(now - Duration::days(2));
        let mut late2 = make_task("late2", "u1");
        late2.due_date = Some(now - Duration::days(1));
        let mut done = make_task("done", "u1");
        done.due_date = Some(now - Duration::days(1));
        done.status = TaskStatus::Completed;
        let mut upcoming = make_task("upcoming", "u2");
        upcoming.due_date = Some(now + Duration::days(1));
        for t in [&late1, &late2, &done, &upcoming] {
            insert_task(&db, t).await.unwrap();
        }

        let overdue = overdue_unnotified(&db, now).await.unwrap();
        let ids: Vec<&str> = overdue.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["late1", "late2"]);

        mark_overdue_notified(&db, &["late1".to_string()]).await.unwrap();
        let overdue = overdue_unnotified(&db, now).await.unwrap();
        assert_eq!(overdue.len(), 1);

        // The per-user view ignores the notification flag.
        let mine = overdue_for_user(&db, "u1", now).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, "late1");
        db.close().await.unwrap();
    }
}
