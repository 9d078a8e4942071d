//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use souk_app::domain::users::records::Requester;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Store the authenticated caller for downstream handlers.
    fn insert_requester(&mut self, requester: Requester);

    /// The authenticated caller, or `401` when the auth middleware did not run.
    fn requester_or_401(&self) -> Result<Requester, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_requester(&mut self, requester: Requester) {
        self.inject(requester);
    }

    fn requester_or_401(&self) -> Result<Requester, StatusError> {
        self.obtain::<Requester>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
