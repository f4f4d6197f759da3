use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use std::collections::HashMap;

use crate::entities::{attendance, prelude::*, sessions};
use crate::models::session::{AttendanceRecord, Session, SessionFields};

/// Repository for training sessions and their attendance responses
pub struct SessionRepository {
    conn: DatabaseConnection,
}

impl SessionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_session_model(row: sessions::Model, attendance: Vec<AttendanceRecord>) -> Session {
        Session {
            id: row.id,
            date: row.date,
            location: row.location,
            description: row.description,
            attendance,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    fn map_attendance_model(row: attendance::Model) -> AttendanceRecord {
        AttendanceRecord {
            user_id: row.user_id,
            attending: row.attending,
            responded_at: row.responded_at,
        }
    }

    // ========================================================================
    // Session Operations
    // ========================================================================

    pub async fn create(&self, fields: SessionFields) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();

        let active = sessions::ActiveModel {
            id: Set(id.clone()),
            date: Set(fields.date),
            location: Set(fields.location),
            description: Set(fields.description),
            created_at: Set(Utc::now().to_rfc3339()),
            updated_at: Set(None),
        };

        Sessions::insert(active)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert session")?;

        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Session>> {
        let Some(row) = Sessions::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query session")?
        else {
            return Ok(None);
        };

        let attendance = self.attendance_for(id).await?;
        Ok(Some(Self::map_session_model(row, attendance)))
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        let row = Sessions::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query session")?;
        Ok(row.is_some())
    }

    /// All sessions, earliest date first.
    pub async fn list(&self) -> Result<Vec<Session>> {
        let rows = Sessions::find()
            .order_by_asc(sessions::Column::Date)
            .order_by_asc(sessions::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list sessions")?;

        let responses = Attendance::find()
            .order_by_asc(attendance::Column::RespondedAt)
            .order_by_asc(attendance::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list attendance")?;

        let mut by_session: HashMap<String, Vec<AttendanceRecord>> = HashMap::new();
        for response in responses {
            by_session
                .entry(response.session_id.clone())
                .or_default()
                .push(Self::map_attendance_model(response));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let attendance = by_session.remove(&row.id).unwrap_or_default();
                Self::map_session_model(row, attendance)
            })
            .collect())
    }

    /// Overwrites date, location and description. Returns `false` if no
    /// session matched.
    pub async fn update(&self, id: &str, fields: SessionFields) -> Result<bool> {
        let Some(row) = Sessions::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query session for update")?
        else {
            return Ok(false);
        };

        let mut active: sessions::ActiveModel = row.into();
        active.date = Set(fields.date);
        active.location = Set(fields.location);
        active.description = Set(fields.description);
        active.updated_at = Set(Some(Utc::now().to_rfc3339()));
        active
            .update(&self.conn)
            .await
            .context("Failed to update session")?;

        Ok(true)
    }

    /// Deletes the session; its attendance rows go with it via the cascade.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        // Explicit delete as well, in case the connection runs without foreign keys.
        Attendance::delete_many()
            .filter(attendance::Column::SessionId.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to delete session attendance")?;

        let result = Sessions::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete session")?;

        Ok(result.rows_affected > 0)
    }

    // ========================================================================
    // Attendance Operations
    // ========================================================================

    /// Records a response, replacing any earlier response by the same user
    /// in one statement.
    /// Returns `false` when the session no longer exists.
    pub async fn upsert_attendance(
        &self,
        session_id: &str,
        user_id: &str,
        attending: bool,
    ) -> Result<bool> {
        let active = attendance::ActiveModel {
            session_id: Set(session_id.to_string()),
            user_id: Set(user_id.to_string()),
            attending: Set(attending),
            // Fixed-width so that text order matches time order.
            responded_at: Set(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
            ..Default::default()
        };

        let result = Attendance::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    attendance::Column::SessionId,
                    attendance::Column::UserId,
                ])
                .update_columns([attendance::Column::Attending, attendance::Column::RespondedAt])
                .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(err) if is_foreign_key_violation(&err) => Ok(false),
            Err(err) => Err(err).context("Failed to record attendance"),
        }
    }

    pub async fn attendance_for(&self, session_id: &str) -> Result<Vec<AttendanceRecord>> {
        let rows = Attendance::find()
            .filter(attendance::Column::SessionId.eq(session_id))
            .order_by_asc(attendance::Column::RespondedAt)
            .order_by_asc(attendance::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query attendance")?;

        Ok(rows.into_iter().map(Self::map_attendance_model).collect())
    }
}

fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
