//! Event banner uploads.

use crate::constants::NOT_AUTHENTICATED_MESSAGE;
use crate::error::{AdminError, Result};
use arenaticket_client::types::UploadResponse;
use arenaticket_client::ApiClient;

const BANNER_PATH: &str = "/admin/upload/banner";

/// MIME type for an image file name; unknown extensions are sent as
/// `application/octet-stream` and left for the server to refuse.
#[must_use]
pub fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Banner image storage.
#[derive(Debug, Clone)]
pub struct BannerUploads {
    api: ApiClient,
}

impl BannerUploads {
    /// Uploads through `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn require_session(&self) -> Result<()> {
        if self.api.current_token().is_none() {
            return Err(AdminError::AuthenticationFailed(
                NOT_AUTHENTICATED_MESSAGE.to_string(),
            ));
        }
        Ok(())
    }

    /// Upload a banner and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::AuthenticationFailed` without a session, or the
    /// request error.
    pub async fn upload_banner(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        self.require_session()?;
        let size = bytes.len();
        let response: UploadResponse = self
            .api
            .upload(BANNER_PATH, "file", file_name, bytes, mime_for(file_name))
            .await?;
        tracing::info!(file_name, size, url = %response.url, "Banner uploaded");
        Ok(response.url)
    }

    /// Delete a previously uploaded banner.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::AuthenticationFailed` without a session, or the
    /// request error.
    pub async fn delete_banner(&self, url: &str) -> Result<()> {
        self.require_session()?;
        self.api
            .delete(&format!("{BANNER_PATH}?url={}", urlencoding::encode(url)))
            .await?;
        tracing::info!(url, "Banner deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_follows_extension() {
        assert_eq!(mime_for("cartaz.JPG"), "image/jpeg");
        assert_eq!(mime_for("banner.png"), "image/png");
        assert_eq!(mime_for("sem_extensao"), "application/octet-stream");
    }
}
