use crate::error::AppError;
use crate::storage::ObjectStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// バケットをディレクトリ、キーをその配下のファイルとして扱うバックエンド。
/// ローカル開発とテストで使用する。
#[derive(Debug, Default, Clone, Copy)]
pub struct FsObjectStore;

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = Path::new(bucket).join(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::StoreUnavailable(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), AppError> {
        let path = Path::new(bucket).join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Persistence(format!("failed to create {}: {e}", parent.display()))
            })?;
        }
        fs::write(&path, body).await.map_err(|e| {
            AppError::Persistence(format!("failed to write {}: {e}", path.display()))
        })
    }
}
