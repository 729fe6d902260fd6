// ── Resource contract ──
//
// Every resource type module maps one kind of Looker object onto its CRUD
// endpoints through this trait. The host runtime (or the CLI standing in
// for it) owns diffing and state persistence; a module only translates
// between typed attributes and HTTP calls.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::schema::Schema;

/// CRUD entry points of a managed resource type.
///
/// `read` returns `Ok(None)` when the remote object is gone so the host can
/// plan a re-create. `delete` clears the state's identifier on success.
pub trait Resource: Send + Sync {
    /// Locally declared attributes.
    type Config: Send + Sync;
    /// The state record persisted by the host between calls.
    type State: Send + Sync;

    const TYPE_NAME: &'static str;

    fn schema() -> Schema;

    fn create(
        &self,
        config: &Self::Config,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Self::State, CoreError>> + Send;

    fn read(
        &self,
        state: &Self::State,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Option<Self::State>, CoreError>> + Send;

    fn update(
        &self,
        state: &Self::State,
        config: &Self::Config,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Self::State, CoreError>> + Send;

    fn delete(
        &self,
        state: &mut Self::State,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Adopt an existing remote object by its import identifier.
    fn import(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Self::State, CoreError>> + Send;
}

/// A read-only lookup.
pub trait DataSource: Send + Sync {
    type Query: Send + Sync;
    type Output: Send + Sync;

    const TYPE_NAME: &'static str;

    fn schema() -> Schema;

    fn read(
        &self,
        query: &Self::Query,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<Self::Output, CoreError>> + Send;
}
