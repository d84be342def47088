use async_trait::async_trait;

use super::model::User;
use crate::store::Result;

#[async_trait]
pub trait UserRepository: Send {
    async fn find_user_by_uuid(&mut self, uuid: &str) -> Result<Option<User>>;
    /// `email` must already be lowercase.
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>>;
    async fn insert_user(&mut self, user: &User) -> Result<()>;
}
