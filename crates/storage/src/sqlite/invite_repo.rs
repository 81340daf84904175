use chrono::{DateTime, Utc};
use track_core::model::{Invite, InviteId};

use super::{
    SqliteRepository,
    mapping::{invite_id_to_i64, map_invite_row},
};
use crate::repository::{InviteRepository, StorageError};

fn conn(e: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
    }
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl InviteRepository for SqliteRepository {
    async fn insert_invite(
        &self,
        code: &str,
        created_at: DateTime<Utc>,
    ) -> Result<InviteId, StorageError> {
        let result = sqlx::query(
            r"
            INSERT INTO invites (code, is_used, used_by_email, created_at)
            VALUES (?1, 0, NULL, ?2)
            ",
        )
        .bind(code)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        let rowid = result.last_insert_rowid();
        Ok(InviteId::new(u64::try_from(rowid).map_err(|_| {
            StorageError::Serialization("invite_id sign overflow".into())
        })?))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Invite>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, code, is_used, used_by_email, created_at
            FROM invites
            WHERE code = ?1
            ",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_invite_row).transpose()
    }

    async fn mark_used(&self, id: InviteId, email: &str) -> Result<(), StorageError> {
        let result = sqlx::query(
            r"
            UPDATE invites
            SET is_used = 1, used_by_email = ?2
            WHERE id = ?1
            ",
        )
        .bind(invite_id_to_i64(id)?)
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
