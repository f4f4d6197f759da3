pub use super::attendance::Entity as Attendance;
pub use super::roster_players::Entity as RosterPlayers;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
