//! Shared application state for all routes.

use crate::links::LinkGenerator;
use crate::repository::{CampRepository, RepositoryProvider};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repositories: Arc<dyn RepositoryProvider>,
    pub links: LinkGenerator,
}

impl AppState {
    pub fn new(repositories: Arc<dyn RepositoryProvider>, links: LinkGenerator) -> Self {
        AppState { repositories, links }
    }

    /// A fresh unit of work for the current request.
    pub fn repository(&self) -> Box<dyn CampRepository> {
        self.repositories.repository()
    }
}
