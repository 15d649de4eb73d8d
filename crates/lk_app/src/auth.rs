use crate::error::AuthError;

/// What the provider hands back on a successful password sign-in. Only the
/// access token is consumed; provider internals stay opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInSession {
    pub access_token: String,
}

/// External sign-in collaborator: a password grant in, a session (or an
/// error description) out.
pub trait AuthProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<SignInSession, AuthError>;
}
