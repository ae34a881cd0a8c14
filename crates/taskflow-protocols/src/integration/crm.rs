//! CRM integration protocol.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::IntegrationError;

pub type ContactProperties = BTreeMap<String, Value>;

/// A CRM contact record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmContact {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub properties: ContactProperties,
}

/// A note attached to a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmNote {
    pub id: String,
    pub contact_id: String,
    pub body: String,
}

/// CRM capability consumed by CRM tasks.
#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Provider name (e.g. "hubspot").
    fn provider(&self) -> &str;

    async fn find_contact_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CrmContact>, IntegrationError>;

    async fn create_contact(
        &self,
        email: &str,
        properties: ContactProperties,
    ) -> Result<CrmContact, IntegrationError>;

    /// Merge `properties` into an existing contact.
    async fn update_contact(
        &self,
        contact_id: &str,
        properties: ContactProperties,
    ) -> Result<CrmContact, IntegrationError>;

    async fn add_note(&self, contact_id: &str, body: &str) -> Result<CrmNote, IntegrationError>;
}
