use std::{ffi::OsString, future::Future, marker::PhantomData, path::PathBuf, sync::Arc, time::Duration};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error};

use crate::errors::ServiceError;
use models::Identified;

/// Generic JSON file-backed collection store.
///
/// Persists a `Vec<T>` as one pretty-printed JSON array. The file is the only
/// source of truth: every call loads it again, nothing is cached between calls.
/// A per-store mutex spans the whole load/mutate/save cycle, so concurrent
/// callers on the same instance never compute the same id or lose updates.
pub struct JsonArrayStore<T> {
    file_path: PathBuf,
    io_timeout: Duration,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonArrayStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Initialize the store from a path. Creates the file with an empty array if missing.
    pub async fn open<P: Into<PathBuf>>(path: P, io_timeout: Duration) -> Result<Arc<Self>, ServiceError> {
        let store = Self {
            file_path: path.into(),
            io_timeout,
            lock: Mutex::new(()),
            _marker: PhantomData,
        };

        if let Some(parent) = store.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            store.io("create dir", fs::create_dir_all(parent)).await?;
        }
        // only a missing file is created; other stat errors surface as Io
        if !store.io("stat", fs::try_exists(&store.file_path)).await? {
            debug!(path = %store.file_path.display(), "collection file missing; creating empty array");
            store.save(&[]).await?;
        }
        Ok(Arc::new(store))
    }

    /// Snapshot of the whole collection in file order.
    pub async fn list(&self) -> Result<Vec<T>, ServiceError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Run a read-only query over a fresh snapshot.
    pub async fn read<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&[T]) -> Result<R, ServiceError>,
    {
        let _guard = self.lock.lock().await;
        let items = self.load().await?;
        f(&items)
    }

    /// Load, apply `f`, and persist only if `f` succeeded.
    pub async fn mutate<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let _guard = self.lock.lock().await;
        let mut items = self.load().await?;
        let out = f(&mut items)?;
        self.save(&items).await?;
        Ok(out)
    }

    async fn load(&self) -> Result<Vec<T>, ServiceError> {
        let bytes = self.io("read", fs::read(&self.file_path)).await?;
        let items: Vec<T> = serde_json::from_slice(&bytes).map_err(|e| {
            error!(path = %self.file_path.display(), error = %e, "collection file is not a valid JSON array");
            ServiceError::Io(format!("cannot parse {}: {e}", self.file_path.display()))
        })?;
        debug!(path = %self.file_path.display(), count = items.len(), "collection loaded");
        Ok(items)
    }

    /// Write to a sibling temp file, then rename over the target.
    async fn save(&self, items: &[T]) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(items)
            .map_err(|e| ServiceError::Io(format!("cannot serialize collection: {e}")))?;
        let tmp = self.tmp_path();
        self.io("write", fs::write(&tmp, data)).await?;
        self.io("rename", fs::rename(&tmp, &self.file_path)).await?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name: OsString = self.file_path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    async fn io<R, Fut>(&self, op: &'static str, fut: Fut) -> Result<R, ServiceError>
    where
        Fut: Future<Output = std::io::Result<R>>,
    {
        match tokio::time::timeout(self.io_timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => {
                error!(op, path = %self.file_path.display(), error = %e, "file operation failed");
                Err(ServiceError::Io(format!("cannot {op} {}: {e}", self.file_path.display())))
            }
            Err(_) => {
                error!(op, path = %self.file_path.display(), timeout = ?self.io_timeout, "file operation timed out");
                Err(ServiceError::Io(format!(
                    "{op} {} timed out after {:?}",
                    self.file_path.display(),
                    self.io_timeout
                )))
            }
        }
    }
}

/// `max(ids) + 1`, or 1 for an empty collection.
///
/// Deleting the current maximum and creating again hands out the same id.
pub fn next_id<T: Identified>(items: &[T]) -> u64 {
    items.iter().map(Identified::id).max().map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: u64,
        name: String,
    }

    impl Identified for Row {
        fn id(&self) -> u64 { self.id }
    }

    fn tmp_file(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("json_array_store_{}", uuid::Uuid::new_v4()))
            .join(format!("{tag}.json"))
    }

    #[tokio::test]
    async fn open_creates_empty_array_file() -> Result<(), anyhow::Error> {
        let path = tmp_file("rows");
        let store = JsonArrayStore::<Row>::open(&path, Duration::from_secs(5)).await?;
        assert_eq!(tokio::fs::read_to_string(&path).await?, "[]");
        assert!(store.list().await?.is_empty());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn mutate_persists_pretty_json_and_reloads() -> Result<(), anyhow::Error> {
        let path = tmp_file("rows");
        let store = JsonArrayStore::<Row>::open(&path, Duration::from_secs(5)).await?;

        let id = store
            .mutate(|rows| {
                let id = next_id(rows);
                rows.push(Row { id, name: "a".into() });
                Ok(id)
            })
            .await?;
        assert_eq!(id, 1);

        let raw = tokio::fs::read_to_string(&path).await?;
        assert!(raw.contains("\n  {\n    \"id\": 1,"), "pretty printed: {raw}");

        // a second instance sees the same data: nothing lives only in memory
        let other = JsonArrayStore::<Row>::open(&path, Duration::from_secs(5)).await?;
        assert_eq!(other.list().await?, vec![Row { id: 1, name: "a".into() }]);
        assert!(!store.tmp_path().exists());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_mutation_leaves_file_untouched() -> Result<(), anyhow::Error> {
        let path = tmp_file("rows");
        let store = JsonArrayStore::<Row>::open(&path, Duration::from_secs(5)).await?;
        store.mutate(|rows| { rows.push(Row { id: 1, name: "keep".into() }); Ok(()) }).await?;
        let before = tokio::fs::read_to_string(&path).await?;

        let res: Result<(), _> = store
            .mutate(|rows| {
                rows.clear();
                Err(ServiceError::Validation("nope".into()))
            })
            .await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert_eq!(tokio::fs::read_to_string(&path).await?, before);

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn open_keeps_existing_file() -> Result<(), anyhow::Error> {
        let path = tmp_file("rows");
        tokio::fs::create_dir_all(path.parent().unwrap()).await?;
        tokio::fs::write(&path, br#"[{"id": 3, "name": "kept"}]"#).await?;

        let store = JsonArrayStore::<Row>::open(&path, Duration::from_secs(5)).await?;
        assert_eq!(store.list().await?, vec![Row { id: 3, name: "kept".into() }]);

        // unreadable content is reported on use, never replaced by `[]`
        tokio::fs::write(&path, b"{not json").await?;
        let again = JsonArrayStore::<Row>::open(&path, Duration::from_secs(5)).await?;
        assert!(matches!(again.list().await, Err(ServiceError::Io(_))));
        assert_eq!(tokio::fs::read(&path).await?, b"{not json");

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_io_error() -> Result<(), anyhow::Error> {
        let path = tmp_file("rows");
        let store = JsonArrayStore::<Row>::open(&path, Duration::from_secs(5)).await?;
        tokio::fs::write(&path, b"{not json").await?;
        assert!(matches!(store.list().await, Err(ServiceError::Io(_))));

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test]
    async fn read_runs_query_on_snapshot() -> Result<(), anyhow::Error> {
        let path = tmp_file("rows");
        let store = JsonArrayStore::<Row>::open(&path, Duration::from_secs(5)).await?;
        store.mutate(|rows| { rows.push(Row { id: 4, name: "x".into() }); Ok(()) }).await?;
        let name = store
            .read(|rows| rows.first().map(|r| r.name.clone()).ok_or_else(|| ServiceError::NotFound("row".into())))
            .await?;
        assert_eq!(name, "x");

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_mutations_get_distinct_ids() -> Result<(), anyhow::Error> {
        let path = tmp_file("rows");
        let store = JsonArrayStore::<Row>::open(&path, Duration::from_secs(5)).await?;

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .mutate(move |rows| {
                        let id = next_id(rows);
                        rows.push(Row { id, name: format!("r{i}") });
                        Ok(id)
                    })
                    .await
            }));
        }
        for h in handles {
            h.await??;
        }

        let mut ids: Vec<u64> = store.list().await?.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());

        let _ = tokio::fs::remove_dir_all(path.parent().unwrap()).await;
        Ok(())
    }

    #[test]
    fn next_id_is_max_plus_one() {
        assert_eq!(next_id::<Row>(&[]), 1);
        let rows = vec![Row { id: 5, name: "a".into() }, Row { id: 2, name: "b".into() }];
        assert_eq!(next_id(&rows), 6);
    }
}
