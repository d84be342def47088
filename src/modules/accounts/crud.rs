use async_trait::async_trait;

use super::interface::UserRepository;
use super::model::User;
use crate::store::{Result, UnitOfWork};

#[async_trait]
impl UserRepository for UnitOfWork {
    async fn find_user_by_uuid(&mut self, uuid: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE uuid = ?")
            .bind(uuid)
            .fetch_optional(self.conn())
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.conn())
            .await?;
        Ok(user)
    }

    async fn insert_user(&mut self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (uuid, email, password_hash, password_hint, key, totp_secret,
                               two_factor_enabled, culture, premium, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.uuid)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.password_hint)
        .bind(&user.key)
        .bind(&user.totp_secret)
        .bind(user.two_factor_enabled)
        .bind(&user.culture)
        .bind(user.premium)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.conn())
        .await?;

        Ok(())
    }
}
