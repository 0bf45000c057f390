use crate::error::AppError;
use crate::storage::ObjectStore;
use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// S3互換ストレージへパス形式 ({endpoint}/{bucket}/{key}) でGET/PUTするバックエンド。
/// 各リクエストにはタイムアウトとリトライ上限がかかる。
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    retry_attempts: u32,
    max_backoff_secs: u64,
}

impl HttpObjectStore {
    pub fn new(
        endpoint: String,
        timeout_secs: u64,
        retry_attempts: u32,
        max_backoff_secs: u64,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            retry_attempts,
            max_backoff_secs,
        })
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, bucket, key)
    }

    /// HTTP GETを1回だけ実行する。
    /// 404はオブジェクト不在としてOk(None)を返す。
    async fn get_once(&self, url: &str) -> Result<Option<Vec<u8>>, AppError> {
        let resp = self.client.get(url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = resp.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(Some(bytes.to_vec()))
    }

    /// HTTP PUTを1回だけ実行する。オブジェクト全体の置き換え。
    async fn put_once(&self, url: &str, body: Vec<u8>) -> Result<(), AppError> {
        let resp = self.client.put(url).body(body).send().await?;
        resp.error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let url = self.object_url(bucket, key);

        for i in 0..self.retry_attempts {
            match self.get_once(&url).await {
                Ok(found) => {
                    return Ok(found);
                }
                Err(e) => {
                    warn!(
                        "[get] attempt {}/{} failed for {}: {}",
                        i + 1,
                        self.retry_attempts,
                        url,
                        e
                    );
                    // 最終試行の後は待たずに打ち切る
                    if i + 1 < self.retry_attempts {
                        let sleep_duration =
                            calc_exponential_backoff_duration(i, self.max_backoff_secs);
                        sleep(sleep_duration).await;
                    }
                }
            }
        }

        Err(AppError::StoreUnavailable(format!(
            "failed to fetch {} after {} attempts",
            url, self.retry_attempts
        )))
    }

    async fn put(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), AppError> {
        let url = self.object_url(bucket, key);

        // PUTは全置き換えなのでリトライしても安全
        for i in 0..self.retry_attempts {
            match self.put_once(&url, body.clone()).await {
                Ok(()) => {
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "[put] attempt {}/{} failed for {}: {}",
                        i + 1,
                        self.retry_attempts,
                        url,
                        e
                    );
                    // 最終試行の後は待たずに打ち切る
                    if i + 1 < self.retry_attempts {
                        let sleep_duration =
                            calc_exponential_backoff_duration(i, self.max_backoff_secs);
                        sleep(sleep_duration).await;
                    }
                }
            }
        }

        Err(AppError::Persistence(format!(
            "failed to upload {} after {} attempts",
            url, self.retry_attempts
        )))
    }
}

/// 指数バックオフのスリープ時間を計算するヘルパー関数
fn calc_exponential_backoff_duration(retry_count: u32, max_backoff_secs: u64) -> Duration {
    let mut rng = rand::rng();
    let random_part: f64 = rng.random();

    let base = 2u64.saturating_pow(retry_count).min(max_backoff_secs);
    let backoff_seconds = (base as f64) + random_part;
    Duration::from_secs_f64(backoff_seconds)
}
