//! Service account request record.

use serde::{Deserialize, Serialize};

use portal_core::account::{AccountFields, RequestStatus};
use portal_core::error::CoreError;
use portal_core::naming::script_filename;
use portal_core::script::{self, ScriptContext};
use portal_core::types::{RequestId, Timestamp};

/// A stored request: the submitted fields plus everything the system assigns.
///
/// `rendered_script` is produced once by [`ServiceAccountRequest::submit`] and
/// never regenerated; status updates leave it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountRequest {
    pub id: RequestId,
    #[serde(flatten)]
    pub fields: AccountFields,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub rendered_script: String,
}

impl ServiceAccountRequest {
    /// Build a new pending request and render its script.
    ///
    /// Fails without side effects if the fields lack something the script
    /// cannot be rendered without.
    pub fn submit(id: RequestId, fields: AccountFields, now: Timestamp) -> Result<Self, CoreError> {
        let rendered_script = script::render(&ScriptContext {
            request_id: &id,
            generated_at: now,
            fields: &fields,
        })?;

        Ok(Self {
            id,
            fields,
            status: RequestStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
            rendered_script,
        })
    }

    /// Apply a status change. Notes are only replaced when supplied, and
    /// `updated_at` never moves before `created_at`.
    pub fn apply_status(&mut self, update: &UpdateStatus, now: Timestamp) {
        self.status = update.status;
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
        self.updated_at = now.max(self.created_at);
    }

    /// File name and content for downloading the rendered script.
    pub fn script_download(&self) -> ScriptDownload {
        ScriptDownload {
            filename: script_filename(self.fields.account_type, &self.fields.account_name),
            content: self.rendered_script.clone(),
        }
    }
}

/// Request body for a status change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatus {
    pub status: RequestStatus,
    pub notes: Option<String>,
}

/// A rendered script ready to be served as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptDownload {
    pub filename: String,
    pub content: String,
}
