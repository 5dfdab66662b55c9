// src/infrastructure/identity.rs
use crate::application::context::Principal;
use crate::application::ports::identity::IdentityResolver;
use async_trait::async_trait;

const SUBJECT_FALLBACKS: &[&str] = &[
    "oid",
    "user_id",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier",
];

const NAME_FALLBACKS: &[&str] = &[
    "preferred_username",
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name",
    "email",
];

/// Resolves the caller from alternative claim types issued by external
/// identity providers.
#[derive(Debug, Clone)]
pub struct ClaimsIdentityResolver {
    subject_claims: Vec<String>,
    name_claims: Vec<String>,
}

impl ClaimsIdentityResolver {
    pub fn new(subject_claims: Vec<String>, name_claims: Vec<String>) -> Self {
        Self {
            subject_claims,
            name_claims,
        }
    }

    fn first_of(principal: &Principal, kinds: &[String]) -> Option<String> {
        kinds
            .iter()
            .find_map(|kind| principal.find_first(kind))
            .map(ToString::to_string)
    }
}

impl Default for ClaimsIdentityResolver {
    fn default() -> Self {
        Self::new(
            SUBJECT_FALLBACKS.iter().map(|s| s.to_string()).collect(),
            NAME_FALLBACKS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

#[async_trait]
impl IdentityResolver for ClaimsIdentityResolver {
    async fn subject_id(&self, principal: &Principal) -> Option<String> {
        Self::first_of(principal, &self.subject_claims)
    }

    async fn user_name(&self, principal: &Principal) -> Option<String> {
        Self::first_of(principal, &self.name_claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn falls_back_through_claim_types_in_order() {
        let resolver = ClaimsIdentityResolver::default();
        let principal = Principal::anonymous()
            .with_claim("email", "ada@example.com")
            .with_claim("preferred_username", "  ")
            .with_claim("user_id", "abc")
            .with_claim("oid", "def");

        assert_eq!(resolver.subject_id(&principal).await.as_deref(), Some("def"));
        assert_eq!(
            resolver.user_name(&principal).await.as_deref(),
            Some("ada@example.com")
        );
        assert_eq!(resolver.subject_id(&Principal::anonymous()).await, None);
    }
}
