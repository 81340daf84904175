use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::InviteId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InviteCodeError {
    #[error("invite code cannot be empty")]
    EmptyCode,
}

/// A single-use signup invite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    id: InviteId,
    code: String,
    used: bool,
    used_by_email: Option<String>,
    created_at: DateTime<Utc>,
}

impl Invite {
    /// Rehydrate an invite from persisted storage.
    ///
    /// Codes are stored uppercase; the constructor normalizes for safety.
    ///
    /// # Errors
    ///
    /// Returns `InviteCodeError::EmptyCode` if the code is empty.
    pub fn from_persisted(
        id: InviteId,
        code: impl Into<String>,
        used: bool,
        used_by_email: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, InviteCodeError> {
        let code = normalize_invite_code(code.into())?;
        Ok(Self {
            id,
            code,
            used,
            used_by_email,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> InviteId {
        self.id
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used
    }

    #[must_use]
    pub fn used_by_email(&self) -> Option<&str> {
        self.used_by_email.as_deref()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Trim and uppercase an invite code, rejecting empty input.
///
/// # Errors
///
/// Returns `InviteCodeError::EmptyCode` for empty or whitespace-only codes.
pub fn normalize_invite_code(raw: String) -> Result<String, InviteCodeError> {
    let code = raw.trim().to_uppercase();
    if code.is_empty() {
        return Err(InviteCodeError::EmptyCode);
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn invite_normalizes_code() {
        let invite =
            Invite::from_persisted(InviteId::new(1), " ab12cd34 ", false, None, fixed_now())
                .unwrap();
        assert_eq!(invite.code(), "AB12CD34");
        assert!(!invite.is_used());
        assert_eq!(invite.used_by_email(), None);
    }

    #[test]
    fn invite_rejects_empty_code() {
        let err = Invite::from_persisted(InviteId::new(1), "  ", false, None, fixed_now())
            .unwrap_err();
        assert_eq!(err, InviteCodeError::EmptyCode);
    }
}
