//! `SeaORM` implementation of the `SessionService` trait.

use crate::constants::placeholders::{UNKNOWN_USER_EMAIL, UNKNOWN_USER_NAME};
use crate::db::Store;
use crate::models::Session;
use crate::models::session::{AttendanceRecord, SessionFields, parse_session_date};
use crate::services::session_service::{
    AttendanceDetail, AttendanceEntry, AttendanceRequest, SessionError, SessionRequest,
    SessionService, SessionSummary,
};
use crate::services::token::AuthUser;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, warn};

pub struct SeaOrmSessionService {
    store: Store,
}

impl SeaOrmSessionService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate(request: SessionRequest) -> Result<SessionFields, SessionError> {
        let date = parse_session_date(&request.date).ok_or_else(|| {
            SessionError::Validation(format!("Invalid session date: {}", request.date))
        })?;

        let location = request.location.trim();
        if location.is_empty() {
            return Err(SessionError::Validation("Location is required".to_string()));
        }

        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(SessionFields {
            date,
            location: location.to_string(),
            description,
        })
    }

    /// Resolves the responding account; any failure degrades to placeholders.
    async fn resolve_entry(&self, record: AttendanceRecord) -> AttendanceEntry {
        let (user_name, user_email) = match self.store.get_user(&record.user_id).await {
            Ok(Some(user)) => (user.name, user.email),
            Ok(None) => (UNKNOWN_USER_NAME.to_string(), UNKNOWN_USER_EMAIL.to_string()),
            Err(e) => {
                warn!(user_id = %record.user_id, error = %e, "Failed to resolve attendee");
                (UNKNOWN_USER_NAME.to_string(), UNKNOWN_USER_EMAIL.to_string())
            }
        };

        AttendanceEntry {
            user_id: record.user_id,
            user_name,
            user_email,
            attending: record.attending,
            responded_at: record.responded_at,
        }
    }
}

fn require_manager(caller: &AuthUser) -> Result<(), SessionError> {
    if caller.role.is_manager() {
        Ok(())
    } else {
        Err(SessionError::Forbidden)
    }
}

fn is_valid_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

#[async_trait]
impl SessionService for SeaOrmSessionService {
    async fn create(
        &self,
        caller: &AuthUser,
        request: SessionRequest,
    ) -> Result<String, SessionError> {
        require_manager(caller)?;
        let fields = Self::validate(request)?;

        let id = self.store.create_session(fields).await?;
        info!(session_id = %id, created_by = %caller.user_id, "Session created");
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Session>, SessionError> {
        Ok(self.store.list_sessions().await?)
    }

    async fn update(
        &self,
        caller: &AuthUser,
        id: &str,
        request: SessionRequest,
    ) -> Result<(), SessionError> {
        require_manager(caller)?;
        let fields = Self::validate(request)?;

        if !is_valid_id(id) || !self.store.update_session(id, fields).await? {
            return Err(SessionError::NotFound);
        }

        info!(session_id = %id, "Session updated");
        Ok(())
    }

    async fn delete(&self, caller: &AuthUser, id: &str) -> Result<(), SessionError> {
        require_manager(caller)?;

        if !is_valid_id(id) || !self.store.remove_session(id).await? {
            return Err(SessionError::NotFound);
        }

        info!(session_id = %id, "Session deleted");
        Ok(())
    }

    async fn submit_attendance(
        &self,
        caller: &AuthUser,
        request: AttendanceRequest,
    ) -> Result<(), SessionError> {
        let user_id = request
            .user_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| caller.user_id.clone());

        if user_id != caller.user_id && !caller.role.is_manager() {
            return Err(SessionError::Forbidden);
        }

        if !is_valid_id(&request.session_id)
            || !self.store.session_exists(&request.session_id).await?
        {
            return Err(SessionError::NotFound);
        }

        // The session can be deleted between the check above and the write.
        if !self
            .store
            .record_attendance(&request.session_id, &user_id, request.attending)
            .await?
        {
            return Err(SessionError::NotFound);
        }

        info!(
            session_id = %request.session_id,
            user_id = %user_id,
            attending = request.attending,
            "Attendance recorded"
        );
        Ok(())
    }

    async fn attendance_detail(&self, id: &str) -> Result<AttendanceDetail, SessionError> {
        if !is_valid_id(id) {
            return Err(SessionError::NotFound);
        }

        let session = self
            .store
            .get_session(id)
            .await?
            .ok_or(SessionError::NotFound)?;

        let attendance = join_all(
            session
                .attendance
                .into_iter()
                .map(|record| self.resolve_entry(record)),
        )
        .await;

        Ok(AttendanceDetail {
            session: SessionSummary {
                id: session.id,
                date: session.date,
                location: session.location,
                description: session.description,
            },
            attendance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::models::user::NewUser;

    async fn setup() -> (SeaOrmSessionService, Store) {
        let path =
            std::env::temp_dir().join(format!("teamsheet-sessions-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", path.display()))
            .await
            .unwrap();
        (SeaOrmSessionService::new(store.clone()), store)
    }

    fn manager() -> AuthUser {
        AuthUser {
            user_id: "manager-1".to_string(),
            role: Role::Manager,
        }
    }

    fn player(id: &str) -> AuthUser {
        AuthUser {
            user_id: id.to_string(),
            role: Role::Player,
        }
    }

    fn request(date: &str, location: &str) -> SessionRequest {
        SessionRequest {
            date: date.to_string(),
            location: location.to_string(),
            description: None,
        }
    }

    fn attend(session_id: &str, user_id: Option<&str>, attending: bool) -> AttendanceRequest {
        AttendanceRequest {
            session_id: session_id.to_string(),
            user_id: user_id.map(str::to_string),
            attending,
        }
    }

    #[tokio::test]
    async fn test_players_cannot_manage_sessions() {
        let (service, _) = setup().await;

        let err = service
            .create(&player("p1"), request("2024-06-01T18:00", "Park"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Forbidden));

        let id = service
            .create(&manager(), request("2024-06-01T18:00", "Park"))
            .await
            .unwrap();
        assert!(matches!(
            service.delete(&player("p1"), &id).await,
            Err(SessionError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected() {
        let (service, _) = setup().await;

        assert!(matches!(
            service.create(&manager(), request("soon", "Park")).await,
            Err(SessionError::Validation(_))
        ));
        assert!(matches!(
            service.create(&manager(), request("2024-06-01", "  ")).await,
            Err(SessionError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_ids() {
        let (service, _) = setup().await;
        let missing = uuid::Uuid::new_v4().to_string();

        assert!(matches!(
            service
                .update(&manager(), &missing, request("2024-06-01", "Park"))
                .await,
            Err(SessionError::NotFound)
        ));
        assert!(matches!(
            service.delete(&manager(), "garbage").await,
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_description() {
        let (service, _) = setup().await;
        let mut create = request("2024-06-01T18:00", "Park");
        create.description = Some("Bring boots".to_string());
        let id = service.create(&manager(), create).await.unwrap();

        service
            .update(&manager(), &id, request("2024-06-02T19:00", "Pitch 2"))
            .await
            .unwrap();

        let sessions = service.list().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].location, "Pitch 2");
        assert!(sessions[0].description.is_none());
        assert!(sessions[0].updated_at.is_some());
    }

    #[tokio::test]
    async fn test_resubmission_keeps_last_answer() {
        let (service, _) = setup().await;
        let id = service
            .create(&manager(), request("2024-06-01T18:00", "Park"))
            .await
            .unwrap();

        let caller = player("p1");
        service
            .submit_attendance(&caller, attend(&id, None, true))
            .await
            .unwrap();
        service
            .submit_attendance(&caller, attend(&id, None, false))
            .await
            .unwrap();

        let detail = service.attendance_detail(&id).await.unwrap();
        assert_eq!(detail.attendance.len(), 1);
        assert_eq!(detail.attendance[0].user_id, "p1");
        assert!(!detail.attendance[0].attending);
    }

    #[tokio::test]
    async fn test_players_answer_only_for_themselves() {
        let (service, _) = setup().await;
        let id = service
            .create(&manager(), request("2024-06-01T18:00", "Park"))
            .await
            .unwrap();

        assert!(matches!(
            service
                .submit_attendance(&player("p1"), attend(&id, Some("p2"), true))
                .await,
            Err(SessionError::Forbidden)
        ));

        service
            .submit_attendance(&manager(), attend(&id, Some("p2"), true))
            .await
            .unwrap();

        assert!(matches!(
            service
                .submit_attendance(
                    &player("p1"),
                    attend(&uuid::Uuid::new_v4().to_string(), None, true)
                )
                .await,
            Err(SessionError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_detail_falls_back_for_unknown_users() {
        let (service, store) = setup().await;
        let id = service
            .create(&manager(), request("2024-06-01T18:00", "Park"))
            .await
            .unwrap();

        let user = store
            .create_user(NewUser {
                name: "Ciara".to_string(),
                email: "ciara@example.com".to_string(),
                password_hash: "x".to_string(),
                role: Role::Player,
            })
            .await
            .unwrap()
            .unwrap();

        service
            .submit_attendance(&player(&user.id), attend(&id, None, true))
            .await
            .unwrap();
        service
            .submit_attendance(&player("ghost"), attend(&id, None, false))
            .await
            .unwrap();

        let detail = service.attendance_detail(&id).await.unwrap();
        assert_eq!(detail.session.location, "Park");
        assert_eq!(detail.attendance.len(), 2);
        assert_eq!(detail.attendance[0].user_name, "Ciara");
        assert_eq!(detail.attendance[0].user_email, "ciara@example.com");
        assert_eq!(detail.attendance[1].user_name, UNKNOWN_USER_NAME);
        assert_eq!(detail.attendance[1].user_email, UNKNOWN_USER_EMAIL);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submissions_leave_one_record() {
        let (service, store) = setup().await;
        let service = std::sync::Arc::new(service);
        let session_id = service
            .create(&manager(), request("2024-06-01T18:00", "Park"))
            .await
            .unwrap();

        let handles: Vec<_> = (0..40)
            .map(|i| {
                let service = service.clone();
                let session_id = session_id.clone();
                tokio::spawn(async move {
                    service
                        .submit_attendance(&player("p1"), attend(&session_id, None, i % 2 == 0))
                        .await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let records = store.get_attendance(&session_id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, "p1");
    }
}

