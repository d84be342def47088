use async_trait::async_trait;

use super::model::{Cipher, Folder};
use crate::store::Result;

/// Folder and cipher persistence. Every lookup is scoped to an owning user,
/// so a row belonging to someone else is indistinguishable from a missing one.
#[async_trait]
pub trait VaultRepository: Send {
    async fn find_folder(&mut self, user_uuid: &str, uuid: &str) -> Result<Option<Folder>>;
    async fn list_folders(&mut self, user_uuid: &str) -> Result<Vec<Folder>>;
    async fn insert_folder(&mut self, folder: &Folder) -> Result<()>;
    async fn update_folder(&mut self, folder: &Folder) -> Result<()>;
    /// Also clears the folder reference on the owner's ciphers.
    async fn delete_folder(&mut self, folder: &Folder) -> Result<()>;

    async fn find_cipher(&mut self, user_uuid: &str, uuid: &str) -> Result<Option<Cipher>>;
    async fn list_ciphers(&mut self, user_uuid: &str) -> Result<Vec<Cipher>>;
    async fn insert_cipher(&mut self, cipher: &Cipher) -> Result<()>;
    async fn update_cipher(&mut self, cipher: &Cipher) -> Result<()>;
    async fn delete_cipher(&mut self, cipher: &Cipher) -> Result<()>;
}
