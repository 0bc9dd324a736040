//! CRM collaborator: the [`CrmApi`] contract plus a HubSpot-backed
//! implementation.
//!
//! The rest of the system only speaks [`CrmApi`], so tests substitute
//! recording fakes and the action handler stays free of HTTP concerns.

pub mod hubspot;
pub mod types;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use hubspot::HubSpotClient;
pub use types::{ContactProperties, ContactRecord, DealProperties};

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("CRM request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("CRM API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// The five CRM operations the assistant can perform. One call per request;
/// no retries.
#[async_trait]
pub trait CrmApi: Send + Sync {
    async fn create_contact(&self, properties: ContactProperties)
        -> Result<ContactRecord, CrmError>;

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: ContactProperties,
    ) -> Result<ContactRecord, CrmError>;

    /// Looks up a contact by exact email match. Returns the first hit, or
    /// `None` when the CRM knows no such contact.
    async fn search_contact(&self, email: &str) -> Result<Option<ContactRecord>, CrmError>;

    async fn delete_contact(&self, contact_id: &str) -> Result<(), CrmError>;

    /// Creates a deal and returns its identifier.
    async fn create_deal(&self, properties: DealProperties) -> Result<String, CrmError>;
}

#[async_trait]
impl<T: CrmApi + ?Sized> CrmApi for Arc<T> {
    async fn create_contact(
        &self,
        properties: ContactProperties,
    ) -> Result<ContactRecord, CrmError> {
        (**self).create_contact(properties).await
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: ContactProperties,
    ) -> Result<ContactRecord, CrmError> {
        (**self).update_contact(contact_id, properties).await
    }

    async fn search_contact(&self, email: &str) -> Result<Option<ContactRecord>, CrmError> {
        (**self).search_contact(email).await
    }

    async fn delete_contact(&self, contact_id: &str) -> Result<(), CrmError> {
        (**self).delete_contact(contact_id).await
    }

    async fn create_deal(&self, properties: DealProperties) -> Result<String, CrmError> {
        (**self).create_deal(properties).await
    }
}
