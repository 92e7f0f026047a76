use stockroom_auth::PrincipalId;
use stockroom_core::UserId;

/// Principal context for a request (authenticated identity).
///
/// Inserted by the auth middleware; every protected route can rely on it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId) -> Self {
        Self { principal_id }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    /// The user whose settings this request reads and writes.
    pub fn user_id(&self) -> UserId {
        self.principal_id.user_id()
    }
}
