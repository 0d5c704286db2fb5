//! Write-only persistence of completed exchanges.

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use crate::BoxFuture;

/// A flattened snapshot of one completed exchange. The store assigns the
/// timestamp.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CaseRecord {
    /// The operator-chosen agent identifier.
    pub agent_id: String,
    /// The user's text.
    pub query: String,
    /// The assistant's text.
    pub response: String,
}

/// Describes a failed write.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PersistError {
    reason: String,
}

impl PersistError {
    /// Creates an error with the given reason.
    #[inline]
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl StdError for PersistError {}

/// A durable store for [`CaseRecord`]s. Records are never read back.
pub trait CaseStore: Send + Sync + 'static {
    /// Stores one record.
    ///
    /// The returned future must be fully independent of `self`.
    fn save(
        &self,
        record: CaseRecord,
    ) -> impl Future<Output = Result<(), PersistError>> + Send + 'static;
}

type SaveFn =
    Arc<dyn Fn(CaseRecord) -> BoxFuture<Result<(), PersistError>> + Send + Sync>;

/// A type-erased [`CaseStore`].
#[derive(Clone)]
pub(crate) struct CaseStoreClient {
    save_fn: SaveFn,
}

impl CaseStoreClient {
    pub(crate) fn new<C: CaseStore>(store: C) -> Self {
        let save_fn: SaveFn = Arc::new(
            move |record: CaseRecord| -> BoxFuture<Result<(), PersistError>> {
                Box::pin(store.save(record))
            },
        );
        Self { save_fn }
    }

    #[inline]
    pub(crate) async fn save(&self, record: CaseRecord) -> Result<(), PersistError> {
        (self.save_fn)(record).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::future::ready;
    use std::sync::Mutex;

    use super::*;

    /// Keeps records in memory, or rejects them all when `broken` is set.
    #[derive(Clone, Default)]
    pub(crate) struct MemoryCaseStore {
        pub(crate) broken: bool,
        pub(crate) records: Arc<Mutex<Vec<CaseRecord>>>,
    }

    impl CaseStore for MemoryCaseStore {
        fn save(
            &self,
            record: CaseRecord,
        ) -> impl Future<Output = Result<(), PersistError>> + Send + 'static
        {
            let result = if self.broken {
                Err(PersistError::new("permission denied"))
            } else {
                self.records.lock().unwrap().push(record);
                Ok(())
            };
            ready(result)
        }
    }

    #[tokio::test]
    async fn test_save() {
        let store = MemoryCaseStore::default();
        let client = CaseStoreClient::new(store.clone());
        let record = CaseRecord {
            agent_id: "Guest_Detective".to_owned(),
            query: "Who?".to_owned(),
            response: "You.".to_owned(),
        };
        client.save(record.clone()).await.unwrap();
        assert_eq!(*store.records.lock().unwrap(), vec![record]);
    }
}
