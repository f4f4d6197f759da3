pub mod token;
pub use token::{AuthUser, Claims, TokenError, TokenSigner};

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, AuthSession, UserProfile};
pub use auth_service_impl::SeaOrmAuthService;

pub mod session_service;
pub mod session_service_impl;
pub use session_service::{AttendanceDetail, SessionError, SessionService};
pub use session_service_impl::SeaOrmSessionService;

pub mod roster_service;
pub mod roster_service_impl;
pub use roster_service::{RosterError, RosterService};
pub use roster_service_impl::SeaOrmRosterService;
