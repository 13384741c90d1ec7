//! Customer identity resolution.

use cart_sync_engine::Identity;

/// Source of the current shopper's identity.
pub trait IdentityProvider: Send + Sync {
    /// The identity as resolved by the storefront, if any.
    fn current(&self) -> Option<Identity>;

    /// The identity, only when the customer is logged in.
    fn logged_in(&self) -> Option<Identity> {
        self.current().filter(|identity| identity.is_logged_in)
    }
}

/// Identity fixed at start-up.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    identity: Option<Identity>,
}

impl StaticIdentity {
    pub fn new(identity: Option<Identity>) -> Self {
        Self { identity }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current(&self) -> Option<Identity> {
        self.identity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_out_identity_is_filtered() {
        let identity = Identity {
            is_logged_in: false,
            ..Identity::logged_in("1", "a@example.com")
        };
        let provider = StaticIdentity::new(Some(identity.clone()));
        assert_eq!(provider.current(), Some(identity));
        assert_eq!(provider.logged_in(), None);
    }

    #[test]
    fn anonymous() {
        assert_eq!(StaticIdentity::anonymous().logged_in(), None);
    }
}
