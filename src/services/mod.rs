pub mod mail;
pub mod session_service;
pub mod session_service_impl;

pub use mail::MailService;
pub use session_service::{
    AuthenticatedUser, IssuedSession, RefreshedAccess, SessionError, SessionService,
};
pub use session_service_impl::SeaOrmSessionService;
