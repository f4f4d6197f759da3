use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::{prelude::*, roster_players};
use crate::models::roster::RosterPlayer;

/// Repository for the legacy roster records
pub struct RosterRepository {
    conn: DatabaseConnection,
}

impl RosterRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(row: roster_players::Model) -> RosterPlayer {
        RosterPlayer {
            id: row.id,
            name: row.name,
            position: row.position,
        }
    }

    pub async fn list(&self) -> Result<Vec<RosterPlayer>> {
        let rows = RosterPlayers::find()
            .order_by_asc(roster_players::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list roster")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<RosterPlayer>> {
        let row = RosterPlayers::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query roster player")?;

        Ok(row.map(Self::map_model))
    }

    pub async fn add(&self, name: &str, position: Option<&str>) -> Result<RosterPlayer> {
        let active = roster_players::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            name: Set(name.to_string()),
            position: Set(position.map(ToString::to_string)),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert roster player")?;

        Ok(Self::map_model(model))
    }

    pub async fn replace(
        &self,
        id: &str,
        name: &str,
        position: Option<&str>,
    ) -> Result<Option<RosterPlayer>> {
        let Some(row) = RosterPlayers::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query roster player for update")?
        else {
            return Ok(None);
        };

        let mut active: roster_players::ActiveModel = row.into();
        active.name = Set(name.to_string());
        active.position = Set(position.map(ToString::to_string));
        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update roster player")?;

        Ok(Some(Self::map_model(model)))
    }

    pub async fn remove(&self, id: &str) -> Result<bool> {
        let result = RosterPlayers::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete roster player")?;

        Ok(result.rows_affected > 0)
    }
}
