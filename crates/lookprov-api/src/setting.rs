// Instance settings endpoints
//
// The settings aggregate is a singleton: it can be read and patched, never
// created or deleted.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{API_VERSION, ApiResponse, LookerClient};
use crate::error::Error;
use crate::models::Setting;

impl LookerClient {
    /// Fetch the full settings aggregate.
    ///
    /// `GET 4.0/setting`
    pub async fn get_setting(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Setting>, Error> {
        debug!("fetching instance settings");
        self.get(&format!("{API_VERSION}/setting"), cancel).await
    }

    /// Patch the settings aggregate.
    ///
    /// `PATCH 4.0/setting`. Only members present in `body` are sent; strip
    /// read-only members first with [`Setting::strip_read_only`].
    pub async fn update_setting(
        &self,
        body: &Setting,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Setting>, Error> {
        debug!("patching instance settings");
        self.update(&format!("{API_VERSION}/setting"), body, cancel)
            .await
    }
}
