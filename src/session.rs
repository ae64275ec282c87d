//! Process-wide authentication state.
//!
//! The credential is readable by every gateway call and written only by the
//! login flow and by the gateway's 401 handler. Each change of credential
//! advances an epoch; a response that arrives under an older epoch belongs
//! to a session that no longer exists and is dropped.

mod context;
mod credential;

pub use self::context::{ActiveCredential, AuthState, ReloadEvent, ReloadReason, SessionContext};
pub use self::credential::{
    Credential, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};
