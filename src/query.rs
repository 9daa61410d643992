use std::sync::Arc;

use crate::err::Error;
use crate::models::CheckInEntry;
use crate::store::Store;

#[derive(Clone)]
pub struct Query {
    store: Arc<dyn Store>,
}

impl Query {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Every check-in with its student's name, ID and email filled in.
    /// Paging and searching happen in the client.
    pub async fn list_checkins(&self) -> Result<Vec<CheckInEntry>, Error> {
        Ok(self.store.list_checkins().await?)
    }
}
