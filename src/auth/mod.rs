//! Authorization for the admin resource surface.
//!
//! Credential issuance and session lifecycle belong to an external auth
//! provider; this module only defines the seam ([`SessionProvider`]), the
//! session shape the core consumes, and the single admin gate every handler
//! runs first ([`AdminSession`]).

mod extractors;
mod password;
mod provider;

pub use extractors::AdminSession;
pub use password::{PasswordConfig, PasswordHasher};
pub use provider::{Role, Session, SessionProvider, StaticSessionProvider};
