use serde::{Deserialize, Serialize};

/// Failures reported by an [`AuthClient`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    /// The email/password pair did not match a registered account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth service could not be reached.
    #[error("auth service unreachable: {context}")]
    Unreachable { context: String },
}

/// An authenticated session returned by [`AuthClient::sign_in`].
///
/// Presence of a session is what gates submission and update screens in
/// deployments that require login; deployments without login never construct
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub token: String,
}

/// Email/password sign-in, delegated to the same hosted service as the
/// request table.
///
/// This is a collaborator contract: the library never stores credentials and
/// never refreshes sessions. [`MemoryStore`] implements it for tests.
///
/// [`MemoryStore`]: crate::MemoryStore
pub trait AuthClient {
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;
}
