use async_trait::async_trait;

use super::interface::VaultRepository;
use super::model::{Cipher, Folder};
use crate::store::{Result, StoreError, UnitOfWork};

#[async_trait]
impl VaultRepository for UnitOfWork {
    // =========================================================================
    // FOLDERS
    // =========================================================================

    async fn find_folder(&mut self, user_uuid: &str, uuid: &str) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE user_uuid = ? AND uuid = ?",
        )
        .bind(user_uuid)
        .bind(uuid)
        .fetch_optional(self.conn())
        .await?;
        Ok(folder)
    }

    async fn list_folders(&mut self, user_uuid: &str) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE user_uuid = ? ORDER BY created_at, uuid",
        )
        .bind(user_uuid)
        .fetch_all(self.conn())
        .await?;
        Ok(folders)
    }

    async fn insert_folder(&mut self, folder: &Folder) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO folders (uuid, user_uuid, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&folder.uuid)
        .bind(&folder.user_uuid)
        .bind(&folder.name)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .execute(self.conn())
        .await?;
        Ok(())
    }

    async fn update_folder(&mut self, folder: &Folder) -> Result<()> {
        let result = sqlx::query(
            "UPDATE folders SET name = ?, updated_at = ? WHERE user_uuid = ? AND uuid = ?",
        )
        .bind(&folder.name)
        .bind(folder.updated_at)
        .bind(&folder.user_uuid)
        .bind(&folder.uuid)
        .execute(self.conn())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict("folders"));
        }
        Ok(())
    }

    async fn delete_folder(&mut self, folder: &Folder) -> Result<()> {
        sqlx::query("UPDATE ciphers SET folder_uuid = NULL WHERE user_uuid = ? AND folder_uuid = ?")
            .bind(&folder.user_uuid)
            .bind(&folder.uuid)
            .execute(self.conn())
            .await?;

        sqlx::query("DELETE FROM folders WHERE user_uuid = ? AND uuid = ?")
            .bind(&folder.user_uuid)
            .bind(&folder.uuid)
            .execute(self.conn())
            .await?;
        Ok(())
    }

    // =========================================================================
    // CIPHERS
    // =========================================================================

    async fn find_cipher(&mut self, user_uuid: &str, uuid: &str) -> Result<Option<Cipher>> {
        let cipher = sqlx::query_as::<_, Cipher>(
            "SELECT * FROM ciphers WHERE user_uuid = ? AND uuid = ?",
        )
        .bind(user_uuid)
        .bind(uuid)
        .fetch_optional(self.conn())
        .await?;
        Ok(cipher)
    }

    async fn list_ciphers(&mut self, user_uuid: &str) -> Result<Vec<Cipher>> {
        let ciphers = sqlx::query_as::<_, Cipher>(
            "SELECT * FROM ciphers WHERE user_uuid = ? ORDER BY created_at, uuid",
        )
        .bind(user_uuid)
        .fetch_all(self.conn())
        .await?;
        Ok(ciphers)
    }

    async fn insert_cipher(&mut self, cipher: &Cipher) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ciphers (uuid, user_uuid, folder_uuid, cipher_type, favorite, name, notes,
                                 data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&cipher.uuid)
        .bind(&cipher.user_uuid)
        .bind(&cipher.folder_uuid)
        .bind(cipher.cipher_type)
        .bind(cipher.favorite)
        .bind(&cipher.name)
        .bind(&cipher.notes)
        .bind(&cipher.data)
        .bind(cipher.created_at)
        .bind(cipher.updated_at)
        .execute(self.conn())
        .await?;
        Ok(())
    }

    async fn update_cipher(&mut self, cipher: &Cipher) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE ciphers
            SET folder_uuid = ?, cipher_type = ?, favorite = ?, name = ?, notes = ?, data = ?,
                updated_at = ?
            WHERE user_uuid = ? AND uuid = ?
            "#,
        )
        .bind(&cipher.folder_uuid)
        .bind(cipher.cipher_type)
        .bind(cipher.favorite)
        .bind(&cipher.name)
        .bind(&cipher.notes)
        .bind(&cipher.data)
        .bind(cipher.updated_at)
        .bind(&cipher.user_uuid)
        .bind(&cipher.uuid)
        .execute(self.conn())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict("ciphers"));
        }
        Ok(())
    }

    async fn delete_cipher(&mut self, cipher: &Cipher) -> Result<()> {
        sqlx::query("DELETE FROM ciphers WHERE user_uuid = ? AND uuid = ?")
            .bind(&cipher.user_uuid)
            .bind(&cipher.uuid)
            .execute(self.conn())
            .await?;
        Ok(())
    }
}
