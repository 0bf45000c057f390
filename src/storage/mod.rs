pub mod fs;
pub mod http;

pub use fs::FsObjectStore;
pub use http::HttpObjectStore;

use crate::error::AppError;
use async_trait::async_trait;

/// 永続オブジェクトストレージへの読み書き。
/// スナップショットはバケット+キーで指す単一オブジェクトとして丸ごと扱う。
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// オブジェクトを取得する。存在しない場合は Ok(None)。
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// オブジェクト全体を置き換える。
    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), AppError>;
}
