use std::{future::Future, path::{Path, PathBuf}, sync::Arc, time::Duration};

use async_trait::async_trait;
use models::blog::{Blog, BlogId};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};
use uuid::Uuid;

use super::{BlogLog, BlogStore, StoreError};

/// JSON file-backed blog store.
///
/// Persists the whole record list as a JSON array. Every insert writes a fresh,
/// fsynced temp file and renames it over the data file, so a crash never leaves
/// a half-written array behind. All file I/O is bounded by `io_timeout`.
pub struct JsonFileBlogStore {
    log: BlogLog,
    file_path: PathBuf,
    io_timeout: Duration,
}

impl JsonFileBlogStore {
    /// Open the store at `path`. Creates the file with an empty array if missing.
    /// An unreadable or corrupt file is an error rather than an empty store.
    pub async fn open<P: Into<PathBuf>>(
        path: P,
        capacity: Option<usize>,
        io_timeout: Duration,
    ) -> Result<Arc<Self>, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            bounded(io_timeout, "create data dir", fs::create_dir_all(parent)).await?;
        }

        let existing = bounded(io_timeout, "read", async {
            match fs::read(&file_path).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await?;
        let records = match existing {
            Some(bytes) => parse_records(&bytes).map_err(|e| {
                StoreError::Storage(format!("corrupt blog file {}: {e}", file_path.display()))
            })?,
            None => {
                write_atomic(&file_path, b"[]", io_timeout).await?;
                info!(path = %file_path.display(), "created empty blog file");
                Vec::new()
            }
        };
        debug!(path = %file_path.display(), count = records.len(), "loaded blogs");

        Ok(Arc::new(Self {
            log: BlogLog::new(records, capacity),
            file_path,
            io_timeout,
        }))
    }

    async fn save(&self, records: Arc<Vec<Blog>>) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(records.as_slice())
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        write_atomic(&self.file_path, &data, self.io_timeout).await
    }
}

#[async_trait]
impl BlogStore for JsonFileBlogStore {
    async fn insert(&self, content: String) -> Result<Blog, StoreError> {
        self.log.append(content, |next| self.save(next)).await
    }

    async fn get(&self, id: BlogId) -> Result<Blog, StoreError> { self.log.get(id) }

    async fn list(&self) -> Vec<Blog> { self.log.list() }

    async fn count(&self) -> usize { self.log.count() }
}

/// Decode and check the on-disk array: ids must be positive and unique.
fn parse_records(bytes: &[u8]) -> Result<Vec<Blog>, String> {
    let mut records: Vec<Blog> = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    records.sort_by_key(|b| b.id);
    if records.first().is_some_and(|b| b.id == 0) {
        return Err("blog id 0 is not allowed".into());
    }
    if let Some(w) = records.windows(2).find(|w| w[0].id == w[1].id) {
        return Err(format!("duplicate blog id {}", w[0].id));
    }
    Ok(records)
}

/// Each call gets its own temp file: a write abandoned by a timeout may still
/// be running and must never share a file with the next one.
async fn write_atomic(path: &Path, data: &[u8], io_timeout: Duration) -> Result<(), StoreError> {
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let tmp = PathBuf::from(tmp);
    let res = bounded(io_timeout, "write", async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, path).await
    })
    .await;
    if res.is_err() {
        let _ = fs::remove_file(&tmp).await;
    }
    res
}

async fn bounded<T, F>(io_timeout: Duration, op: &str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = std::io::Result<T>>,
{
    match tokio::time::timeout(io_timeout, fut).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(StoreError::Storage(format!("{op} failed: {e}"))),
        Err(_) => Err(StoreError::Storage(format!("{op} timed out after {io_timeout:?}"))),
    }
}
