pub mod prelude;

pub mod attendance;
pub mod roster_players;
pub mod sessions;
pub mod users;
