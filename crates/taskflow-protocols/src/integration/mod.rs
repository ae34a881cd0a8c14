//! Integration protocol definitions.
//!
//! Integrations are the external capabilities tasks consume. Each one is
//! optional: the registry only exposes tasks whose integration is present.

mod crm;
mod http;
mod kv;

pub use crm::*;
pub use http::*;
pub use kv::*;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Kind of external integration a task may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationKind {
    Http,
    Kv,
    Crm,
}

impl IntegrationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationKind::Http => "http",
            IntegrationKind::Kv => "kv",
            IntegrationKind::Crm => "crm",
        }
    }
}

impl fmt::Display for IntegrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of integrations available to one registry build.
///
/// Every field may be absent; registry construction is total over any
/// combination.
#[derive(Clone, Default)]
pub struct Integrations {
    pub http: Option<Arc<dyn HttpClient>>,
    pub kv: Option<Arc<dyn KeyValueStore>>,
    pub crm: Option<Arc<dyn CrmClient>>,
}

impl Integrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http = Some(client);
        self
    }

    pub fn with_kv(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.kv = Some(store);
        self
    }

    pub fn with_crm(mut self, client: Arc<dyn CrmClient>) -> Self {
        self.crm = Some(client);
        self
    }

    pub fn is_available(&self, kind: IntegrationKind) -> bool {
        match kind {
            IntegrationKind::Http => self.http.is_some(),
            IntegrationKind::Kv => self.kv.is_some(),
            IntegrationKind::Crm => self.crm.is_some(),
        }
    }

    /// Kinds currently present, in a stable order.
    pub fn available(&self) -> Vec<IntegrationKind> {
        [IntegrationKind::Http, IntegrationKind::Kv, IntegrationKind::Crm]
            .into_iter()
            .filter(|kind| self.is_available(*kind))
            .collect()
    }
}

impl fmt::Debug for Integrations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Integrations")
            .field("http", &self.http.as_ref().map(|c| c.id().to_string()))
            .field("kv", &self.kv.as_ref().map(|s| s.id().to_string()))
            .field("crm", &self.crm.as_ref().map(|c| c.provider().to_string()))
            .finish()
    }
}
