/// Bearer-token session. This is the single authority for "is the user
/// signed in": a present token means authenticated, nothing else does.
///
/// The stored identity is only meaningful while its token lives, so any
/// change of token value drops it; a fresh profile lookup repopulates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    token: Option<String>,
    user_identity: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user_identity(&self) -> Option<&str> {
        self.user_identity.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// True when `issued` is still the live token. Used to discard responses
    /// that raced with a sign-out or token replacement.
    pub fn token_is(&self, issued: &str) -> bool {
        self.token.as_deref() == Some(issued)
    }

    pub fn set_token(&mut self, token: Option<String>) {
        if self.token != token {
            self.user_identity = None;
        }
        self.token = token;
    }

    pub fn set_user_identity(&mut self, identity: Option<String>) {
        self.user_identity = identity;
    }
}
