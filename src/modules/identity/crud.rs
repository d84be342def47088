use async_trait::async_trait;
use chrono::Utc;

use super::interface::DeviceRepository;
use super::model::Device;
use crate::store::{Result, StoreError, UnitOfWork};

#[async_trait]
impl DeviceRepository for UnitOfWork {
    async fn find_device_by_uuid(&mut self, uuid: &str) -> Result<Option<Device>> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE uuid = ?")
            .bind(uuid)
            .fetch_optional(self.conn())
            .await?;
        Ok(device)
    }

    async fn find_device_by_access_token(&mut self, token: &str) -> Result<Option<Device>> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE access_token = ?")
            .bind(token)
            .fetch_optional(self.conn())
            .await?;
        Ok(device)
    }

    async fn find_device_by_refresh_token(&mut self, token: &str) -> Result<Option<Device>> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE refresh_token = ?")
            .bind(token)
            .fetch_optional(self.conn())
            .await?;
        Ok(device)
    }

    async fn save_device(&mut self, device: &mut Device) -> Result<()> {
        device.updated_at = Utc::now();

        if !device.is_persisted() {
            sqlx::query(
                r#"
                INSERT INTO devices (uuid, user_uuid, name, device_type, push_token,
                                     access_token, refresh_token, token_expires_at, version,
                                     created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
                "#,
            )
            .bind(&device.uuid)
            .bind(&device.user_uuid)
            .bind(&device.name)
            .bind(&device.device_type)
            .bind(&device.push_token)
            .bind(&device.access_token)
            .bind(&device.refresh_token)
            .bind(device.token_expires_at)
            .bind(device.created_at)
            .bind(device.updated_at)
            .execute(self.conn())
            .await?;

            device.version = 1;
            return Ok(());
        }

        let result = sqlx::query(
            r#"
            UPDATE devices
            SET name = ?, device_type = ?, push_token = ?, access_token = ?, refresh_token = ?,
                token_expires_at = ?, version = version + 1, updated_at = ?
            WHERE uuid = ? AND version = ?
            "#,
        )
        .bind(&device.name)
        .bind(&device.device_type)
        .bind(&device.push_token)
        .bind(&device.access_token)
        .bind(&device.refresh_token)
        .bind(device.token_expires_at)
        .bind(device.updated_at)
        .bind(&device.uuid)
        .bind(device.version)
        .execute(self.conn())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict("devices"));
        }

        device.version += 1;
        Ok(())
    }

    async fn delete_device(&mut self, uuid: &str) -> Result<()> {
        sqlx::query("DELETE FROM devices WHERE uuid = ?")
            .bind(uuid)
            .execute(self.conn())
            .await?;
        Ok(())
    }
}
