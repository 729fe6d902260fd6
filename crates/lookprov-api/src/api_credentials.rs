// API credential endpoints
//
// API3 credentials live under the owning user:
// `4.0/users/{user_id}/credentials_api3[/{id}]`. The secret is only ever
// returned by the create call.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{API_VERSION, ApiResponse, ListOptions, LookerClient, segment};
use crate::error::Error;
use crate::models::{ApiCredential, ApiCredentialCreate};

fn credentials_path(user_id: &str) -> String {
    format!("{API_VERSION}/users/{}/credentials_api3", segment(user_id))
}

impl LookerClient {
    /// Fetch one credential of a user.
    ///
    /// `GET 4.0/users/{user_id}/credentials_api3/{id}`
    pub async fn get_api_credential(
        &self,
        user_id: &str,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ApiCredential>, Error> {
        debug!(user_id, id, "fetching api credential");
        let path = format!("{}/{}", credentials_path(user_id), segment(id));
        self.get(&path, cancel).await
    }

    /// List all credentials of a user.
    ///
    /// `GET 4.0/users/{user_id}/credentials_api3`
    pub async fn list_api_credentials(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<Vec<ApiCredential>>, Error> {
        self.list(&credentials_path(user_id), &ListOptions::default(), cancel)
            .await
    }

    /// Issue a new credential. The response carries the one-time secret.
    ///
    /// `POST 4.0/users/{user_id}/credentials_api3`
    pub async fn create_api_credential(
        &self,
        user_id: &str,
        body: &ApiCredentialCreate,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<ApiCredential>, Error> {
        debug!(user_id, credential_type = %body.credential_type, "creating api credential");
        self.create(&credentials_path(user_id), body, cancel).await
    }

    /// Revoke a credential.
    ///
    /// `DELETE 4.0/users/{user_id}/credentials_api3/{id}`
    pub async fn delete_api_credential(
        &self,
        user_id: &str,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse<()>, Error> {
        debug!(user_id, id, "deleting api credential");
        let path = format!("{}/{}", credentials_path(user_id), segment(id));
        self.delete(&path, cancel).await
    }
}
