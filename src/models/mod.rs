pub mod roster;
pub mod session;
pub mod user;

pub use roster::RosterPlayer;
pub use session::{AttendanceRecord, Session};
pub use user::{ProfileInfo, Role, User};
