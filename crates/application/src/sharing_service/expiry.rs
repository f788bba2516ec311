use chrono::{DateTime, Utc};

use super::*;

impl SharingService {
    /// Materializes expiry for every grant whose expiry is at or before `now`.
    ///
    /// Reads evaluate status lazily, so this only keeps storage in step; it
    /// is run periodically by the worker.
    pub async fn expire_grants(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.repository.expire_grants(now).await
    }
}
