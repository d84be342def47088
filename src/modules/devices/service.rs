use crate::error::ApiError;
use crate::modules::identity::interface::DeviceRepository;
use crate::modules::identity::model::Device;

/// Attach `push_token` to the bearer-resolved device, or detach it with `None`.
///
/// `device` is the copy read while resolving the bearer; the save is a
/// compare-and-set against that read.
pub async fn set_push_token<R: DeviceRepository>(
    repo: &mut R,
    mut device: Device,
    push_token: Option<&str>,
) -> Result<Device, ApiError> {
    device.push_token = push_token.map(str::to_string);
    repo.save_device(&mut device)
        .await
        .map_err(ApiError::save("error saving"))?;
    Ok(device)
}
