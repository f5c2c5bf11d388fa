//! Repository for service account requests.

use chrono::Utc;
use portal_core::account::AccountFields;
use portal_core::naming::new_request_id;
use portal_core::types::Timestamp;
use portal_core::validation::validate_fields;

use crate::error::StoreError;
use crate::models::request::{ScriptDownload, ServiceAccountRequest, UpdateStatus};
use crate::store::RequestStore;

/// Provides the request lifecycle: list, lookup, submit and status change.
/// Records are never deleted.
pub struct RequestRepo;

impl RequestRepo {
    /// All requests in submission order.
    pub async fn list_all(store: &RequestStore) -> Result<Vec<ServiceAccountRequest>, StoreError> {
        store.read(|requests| requests).await
    }

    /// Find a request by its exact identifier.
    pub async fn find_by_id(
        store: &RequestStore,
        id: &str,
    ) -> Result<Option<ServiceAccountRequest>, StoreError> {
        store
            .read(|requests| requests.into_iter().find(|r| r.id == id))
            .await
    }

    /// Validate, render and append a new request stamped with the current time.
    pub async fn create(
        store: &RequestStore,
        input: &AccountFields,
    ) -> Result<ServiceAccountRequest, StoreError> {
        Self::create_at(store, input, Utc::now()).await
    }

    /// Same as [`RequestRepo::create`] with an explicit timestamp.
    ///
    /// Validation and rendering both happen before the store is touched, so
    /// a rejected submission leaves the collection unchanged.
    pub async fn create_at(
        store: &RequestStore,
        input: &AccountFields,
        now: Timestamp,
    ) -> Result<ServiceAccountRequest, StoreError> {
        validate_fields(input)?;
        let request = ServiceAccountRequest::submit(new_request_id(), input.clone(), now)?;

        store
            .modify(|requests| {
                requests.push(request.clone());
                Ok(())
            })
            .await?;

        tracing::debug!(id = %request.id, "Appended request");
        Ok(request)
    }

    /// Change a request's status (and optionally its notes).
    ///
    /// Returns `None` when no request has the given identifier; nothing is
    /// written in that case.
    pub async fn update_status(
        store: &RequestStore,
        id: &str,
        input: &UpdateStatus,
    ) -> Result<Option<ServiceAccountRequest>, StoreError> {
        Self::update_status_at(store, id, input, Utc::now()).await
    }

    /// Same as [`RequestRepo::update_status`] with an explicit timestamp.
    pub async fn update_status_at(
        store: &RequestStore,
        id: &str,
        input: &UpdateStatus,
        now: Timestamp,
    ) -> Result<Option<ServiceAccountRequest>, StoreError> {
        // Probe first so a miss does not rewrite the file.
        if Self::find_by_id(store, id).await?.is_none() {
            return Ok(None);
        }

        store
            .modify(|requests| {
                Ok(requests.iter_mut().find(|r| r.id == id).map(|request| {
                    request.apply_status(input, now);
                    request.clone()
                }))
            })
            .await
    }

    /// The stored script of a request, with its download file name.
    pub async fn find_script(
        store: &RequestStore,
        id: &str,
    ) -> Result<Option<ScriptDownload>, StoreError> {
        Ok(Self::find_by_id(store, id)
            .await?
            .map(|request| request.script_download()))
    }
}
