use chrono::NaiveDate;
use sqlx::Row;
use track_core::model::{SetEntry, SetId};

use super::{
    SqliteRepository,
    mapping::{map_set_row, set_id_to_i64},
};
use crate::repository::{NewSetRecord, SetRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl SetRepository for SqliteRepository {
    async fn insert_sets(&self, records: &[NewSetRecord]) -> Result<Vec<SetId>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            let result = sqlx::query(
                r"
                INSERT INTO workout_sets (
                    exercise_name, category, weight, reps, set_date,
                    is_completed, sort_order, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
            )
            .bind(record.exercise.as_str())
            .bind(record.category.as_str())
            .bind(record.weight)
            .bind(i64::from(record.reps))
            .bind(record.date)
            .bind(record.completed)
            .bind(i64::from(record.sort_order))
            .bind(record.created_at)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

            let rowid = result.last_insert_rowid();
            ids.push(SetId::new(u64::try_from(rowid).map_err(|_| {
                StorageError::Serialization("set_id sign overflow".into())
            })?));
        }

        tx.commit().await.map_err(conn)?;
        Ok(ids)
    }

    async fn list_all(&self) -> Result<Vec<SetEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, exercise_name, category, weight, reps, set_date,
                   is_completed, sort_order, created_at
            FROM workout_sets
            ORDER BY created_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut sets = Vec::with_capacity(rows.len());
        for row in rows {
            sets.push(map_set_row(&row)?);
        }
        Ok(sets)
    }

    async fn list_for_day(&self, date: NaiveDate) -> Result<Vec<SetEntry>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, exercise_name, category, weight, reps, set_date,
                   is_completed, sort_order, created_at
            FROM workout_sets
            WHERE set_date = ?1
            ORDER BY sort_order ASC, created_at ASC, id ASC
            ",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut sets = Vec::with_capacity(rows.len());
        for row in rows {
            sets.push(map_set_row(&row)?);
        }
        Ok(sets)
    }

    async fn update_metrics(&self, id: SetId, weight: f64, reps: u32) -> Result<(), StorageError> {
        let result = sqlx::query(
            r"
            UPDATE workout_sets
            SET weight = CASE WHEN category = 'STRENGTH' THEN ?2 ELSE 0 END,
                reps = ?3
            WHERE id = ?1
            ",
        )
        .bind(set_id_to_i64(id)?)
        .bind(weight)
        .bind(i64::from(reps))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn set_completed(&self, id: SetId, completed: bool) -> Result<(), StorageError> {
        let result = sqlx::query("UPDATE workout_sets SET is_completed = ?2 WHERE id = ?1")
            .bind(set_id_to_i64(id)?)
            .bind(completed)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn update_sort_orders(&self, changes: &[(SetId, u32)]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        for (id, order) in changes {
            let result = sqlx::query("UPDATE workout_sets SET sort_order = ?2 WHERE id = ?1")
                .bind(set_id_to_i64(*id)?)
                .bind(i64::from(*order))
                .execute(&mut *tx)
                .await
                .map_err(conn)?;

            // Rolling back on the first miss keeps the batch all-or-nothing.
            if result.rows_affected() == 0 {
                tx.rollback().await.map_err(conn)?;
                return Err(StorageError::NotFound);
            }
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn delete_set(&self, id: SetId) -> Result<(), StorageError> {
        let result = sqlx::query("DELETE FROM workout_sets WHERE id = ?1")
            .bind(set_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_for_day(&self, date: NaiveDate) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM workout_sets WHERE set_date = ?1")
            .bind(date)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        Ok(result.rows_affected())
    }

    async fn workout_dates(&self) -> Result<Vec<NaiveDate>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT DISTINCT set_date
            FROM workout_sets
            ORDER BY set_date DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut dates = Vec::with_capacity(rows.len());
        for row in rows {
            dates.push(
                row.try_get("set_date")
                    .map_err(|e: sqlx::Error| StorageError::Serialization(e.to_string()))?,
            );
        }
        Ok(dates)
    }
}
