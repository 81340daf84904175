use std::sync::Arc;

use rand::Rng;
use tracing::{info, warn};

use storage::repository::{InviteRepository, StorageError};
use track_core::model::normalize_invite_code;

use crate::Clock;
use crate::error::InviteError;

const CODE_LENGTH: usize = 8;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
// Retried only on the (vanishingly rare) unique-code collision.
const GENERATE_ATTEMPTS: u32 = 3;

/// Single-use signup invites, gated on one authorized email address.
#[derive(Clone)]
pub struct InviteService {
    clock: Clock,
    authorized_email: String,
    invites: Arc<dyn InviteRepository>,
}

impl InviteService {
    #[must_use]
    pub fn new(clock: Clock, authorized_email: String, invites: Arc<dyn InviteRepository>) -> Self {
        Self {
            clock,
            authorized_email,
            invites,
        }
    }

    /// Generate and store a fresh invite code for the authorized email.
    ///
    /// # Errors
    ///
    /// Returns `InviteError::NotAuthorized` for any other email and
    /// `InviteError::Storage` if the code cannot be stored.
    pub async fn generate(&self, email: &str) -> Result<String, InviteError> {
        if email != self.authorized_email {
            warn!("invite generation rejected for unauthorized email");
            return Err(InviteError::NotAuthorized);
        }

        for _ in 0..GENERATE_ATTEMPTS {
            let code = random_code();
            match self.invites.insert_invite(&code, self.clock.now()).await {
                Ok(_) => {
                    // The code is the secret; log the event only.
                    info!("invite code generated");
                    return Ok(code);
                }
                Err(StorageError::Conflict) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Err(StorageError::Conflict.into())
    }

    /// Redeem an invite code on behalf of a signup email.
    ///
    /// # Errors
    ///
    /// Returns `InviteError::UnknownCode` for codes that were never issued,
    /// `InviteError::AlreadyUsed` for spent codes, and `InviteError::Storage`
    /// if persistence fails.
    pub async fn redeem(&self, code: &str, email: &str) -> Result<(), InviteError> {
        let code = normalize_invite_code(code.to_owned())?;
        let invite = self
            .invites
            .find_by_code(&code)
            .await?
            .ok_or(InviteError::UnknownCode)?;
        if invite.is_used() {
            return Err(InviteError::AlreadyUsed);
        }
        self.invites.mark_used(invite.id(), email).await?;
        info!("invite code redeemed");
        Ok(())
    }
}

fn random_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let i = rng.random_range(0..CODE_ALPHABET.len());
            char::from(CODE_ALPHABET[i])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::InMemoryRepository;
    use track_core::time::fixed_now;

    fn service() -> InviteService {
        InviteService::new(
            Clock::Fixed(fixed_now()),
            "owner@example.com".to_owned(),
            Arc::new(InMemoryRepository::new()),
        )
    }

    #[test]
    fn codes_are_eight_uppercase_base36_chars() {
        for _ in 0..32 {
            let code = random_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[tokio::test]
    async fn only_the_authorized_email_can_generate() {
        let service = service();
        let err = service.generate("intruder@example.com").await.unwrap_err();
        assert!(matches!(err, InviteError::NotAuthorized));

        let code = service.generate("owner@example.com").await.unwrap();
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[tokio::test]
    async fn redeem_consumes_a_code_exactly_once() {
        let service = service();
        let code = service.generate("owner@example.com").await.unwrap();

        service.redeem(&code, "friend@example.com").await.unwrap();

        let err = service
            .redeem(&code, "other@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, InviteError::AlreadyUsed));
    }

    #[tokio::test]
    async fn unknown_codes_are_rejected() {
        let service = service();
        let err = service
            .redeem("NOPE1234", "friend@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, InviteError::UnknownCode));
    }

    #[tokio::test]
    async fn redeem_normalizes_code_case() {
        let service = service();
        let code = service.generate("owner@example.com").await.unwrap();

        service
            .redeem(&code.to_lowercase(), "friend@example.com")
            .await
            .unwrap();
    }
}
