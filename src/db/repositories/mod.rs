pub mod roster;
pub mod session;
pub mod user;
