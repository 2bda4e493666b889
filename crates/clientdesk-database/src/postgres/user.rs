//! User account statements.

use async_trait::async_trait;

use clientdesk_core::result::AppResult;
use clientdesk_entity::user::{NewUser, User, UserChanges};

use super::{PgUnitOfWork, db_error, user_write_error};
use crate::store::UserRepository;

#[async_trait]
impl UserRepository for PgUnitOfWork {
    async fn find_user(&mut self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    async fn find_user_by_email(&mut self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_error("Failed to find user by email"))
    }

    async fn insert_user(&mut self, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (name, email, password_hash, role)
               VALUES ($1, $2, $3, $4)
               RETURNING *"#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(user_write_error("Failed to create user"))
    }

    async fn update_user(&mut self, id: i64, changes: &UserChanges) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   password_hash = COALESCE($4, password_hash),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(user_write_error("Failed to update user"))
    }

    async fn delete_user(&mut self, id: i64) -> AppResult<bool> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map(|r| r.rows_affected() > 0)
            .map_err(db_error("Failed to delete user"))
    }
}
