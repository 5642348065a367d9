//! Service layer: the only place backend requests are built

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod members;

use std::sync::Arc;

use serde::Serialize;

use crate::rpc::LibraryBackend;

/// One page of a backend list together with the total row count
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub members: members::MembersService,
    pub loans: loans::LoansService,
}

impl Services {
    /// Create all services on top of the given backend
    pub fn new(backend: Arc<dyn LibraryBackend>) -> Self {
        Self {
            auth: auth::AuthService::new(backend.clone()),
            catalog: catalog::CatalogService::new(backend.clone()),
            members: members::MembersService::new(backend.clone()),
            loans: loans::LoansService::new(backend),
        }
    }
}
