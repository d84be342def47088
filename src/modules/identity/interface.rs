use async_trait::async_trait;

use super::model::Device;
use crate::store::Result;

/// Everything the Token Service and Bearer Resolver need to know about
/// device persistence.
#[async_trait]
pub trait DeviceRepository: Send {
    async fn find_device_by_uuid(&mut self, uuid: &str) -> Result<Option<Device>>;
    async fn find_device_by_access_token(&mut self, token: &str) -> Result<Option<Device>>;
    async fn find_device_by_refresh_token(&mut self, token: &str) -> Result<Option<Device>>;

    /// Insert a new device or compare-and-set an existing one on `version`.
    /// A concurrent write since `device` was read yields `StoreError::Conflict`.
    async fn save_device(&mut self, device: &mut Device) -> Result<()>;

    async fn delete_device(&mut self, uuid: &str) -> Result<()>;
}
