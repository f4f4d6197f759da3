//! `SeaORM` implementation of the `RosterService` trait.

use crate::db::Store;
use crate::models::RosterPlayer;
use crate::models::roster::RosterPlayerInput;
use crate::services::roster_service::{RosterError, RosterService};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmRosterService {
    store: Store,
}

impl SeaOrmRosterService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Trims both fields; a blank position is stored as absent.
fn normalise(input: &RosterPlayerInput) -> Result<(&str, Option<&str>), RosterError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(RosterError::Validation("Name is required".to_string()));
    }

    let position = input
        .position
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    Ok((name, position))
}

fn is_valid_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}

#[async_trait]
impl RosterService for SeaOrmRosterService {
    async fn list(&self) -> Result<Vec<RosterPlayer>, RosterError> {
        Ok(self.store.list_roster().await?)
    }

    async fn get(&self, id: &str) -> Result<RosterPlayer, RosterError> {
        if !is_valid_id(id) {
            return Err(RosterError::NotFound);
        }

        self.store
            .get_roster_player(id)
            .await?
            .ok_or(RosterError::NotFound)
    }

    async fn create(&self, input: RosterPlayerInput) -> Result<RosterPlayer, RosterError> {
        let (name, position) = normalise(&input)?;
        let player = self.store.add_roster_player(name, position).await?;
        info!(player_id = %player.id, "Roster player added");
        Ok(player)
    }

    async fn update(
        &self,
        id: &str,
        input: RosterPlayerInput,
    ) -> Result<RosterPlayer, RosterError> {
        let (name, position) = normalise(&input)?;
        if !is_valid_id(id) {
            return Err(RosterError::NotFound);
        }

        self.store
            .replace_roster_player(id, name, position)
            .await?
            .ok_or(RosterError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), RosterError> {
        if !is_valid_id(id) || !self.store.remove_roster_player(id).await? {
            return Err(RosterError::NotFound);
        }

        info!(player_id = %id, "Roster player removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> SeaOrmRosterService {
        let path =
            std::env::temp_dir().join(format!("teamsheet-roster-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", path.display()))
            .await
            .unwrap();
        SeaOrmRosterService::new(store)
    }

    fn input(name: &str, position: Option<&str>) -> RosterPlayerInput {
        RosterPlayerInput {
            name: name.to_string(),
            position: position.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_empty_roster_lists_nothing() {
        let service = service().await;
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_crud_cycle() {
        let service = service().await;

        let created = service
            .create(input("  Seán ", Some("Full back")))
            .await
            .unwrap();
        assert_eq!(created.name, "Seán");
        assert_eq!(created.position.as_deref(), Some("Full back"));

        let updated = service
            .update(&created.id, input("Seán", Some(" ")))
            .await
            .unwrap();
        assert!(updated.position.is_none());
        assert_eq!(service.get(&created.id).await.unwrap(), updated);

        service.delete(&created.id).await.unwrap();
        assert!(matches!(
            service.get(&created.id).await,
            Err(RosterError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_bad_ids_and_names() {
        let service = service().await;

        assert!(matches!(
            service.create(input("", None)).await,
            Err(RosterError::Validation(_))
        ));
        assert!(matches!(
            service.get("not-an-id").await,
            Err(RosterError::NotFound)
        ));
        assert!(matches!(
            service.delete(&uuid::Uuid::new_v4().to_string()).await,
            Err(RosterError::NotFound)
        ));
        assert!(matches!(
            service
                .update(&uuid::Uuid::new_v4().to_string(), input("A", None))
                .await,
            Err(RosterError::NotFound)
        ));
    }
}
