use crate::allowlist::AllowList;
use crate::config::Config;
use crate::error::AppError;
use crate::normalize::normalize;
use crate::snapshot::Snapshot;
use crate::storage::ObjectStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

/// 追加バッチの結果。正規化に失敗した入力はrejectedへ、
/// 許可リストと重なったものはskipped_allowedへ積まれる。
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: usize,
    pub skipped_allowed: Vec<String>,
    pub rejected: Vec<String>,
}

impl AddReport {
    pub fn render(&self) -> String {
        render_result("IPs added successfully", &self.rejected)
    }
}

/// 削除バッチの結果。存在しないキーはmissingに数えるだけで、エラーにはしない。
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub removed: usize,
    pub missing: usize,
    pub rejected: Vec<String>,
}

impl DeleteReport {
    pub fn render(&self) -> String {
        render_result("IPs deleted successfully", &self.rejected)
    }
}

fn render_result(base: &str, rejected: &[String]) -> String {
    if rejected.is_empty() {
        base.to_string()
    } else {
        format!(
            "{} (skipped {} invalid: {})",
            base,
            rejected.len(),
            rejected.join(", ")
        )
    }
}

/// ブロックリストの保守本体。ストレージクライアントと許可リストは
/// 起動時に注入され、リクエスト間でスナップショットは保持しない。
/// ロードとセーブの間に別プロセスの書き込みが入った場合は後勝ちになる。
pub struct BlocklistStore {
    storage: Arc<dyn ObjectStore>,
    allowlist: AllowList,
    bucket: String,
    key: String,
    scratch_path: PathBuf,
    max_entries: usize,
}

impl BlocklistStore {
    pub fn new(storage: Arc<dyn ObjectStore>, allowlist: AllowList, config: &Config) -> Self {
        Self {
            storage,
            allowlist,
            bucket: config.bucket.clone(),
            key: config.key.clone(),
            scratch_path: config.scratch_path(),
            max_entries: config.max_entries,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// 永続ストレージからスナップショットを読み込む。
    /// オブジェクト不在・取得失敗・内容破損はすべて空のスナップショットに
    /// 落とす。破損した保存内容は次の正常なsaveで上書きされる。
    pub async fn load(&self) -> Snapshot {
        let bytes = match self.storage.get(&self.bucket, &self.key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                info!(
                    "no stored blocklist at {}/{}, starting empty",
                    self.bucket, self.key
                );
                return Snapshot::new();
            }
            Err(e) => {
                warn!("blocklist load degraded to empty snapshot: {e}");
                return Snapshot::new();
            }
        };

        // 取得内容の控えをスクラッチに置く。失敗してもロードは続行する。
        if let Err(e) = fs::write(&self.scratch_path, &bytes).await {
            warn!(
                "failed to stage snapshot at {}: {e}",
                self.scratch_path.display()
            );
        }

        match Snapshot::from_json(&bytes) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("blocklist load degraded to empty snapshot: {e}");
                Snapshot::new()
            }
        }
    }

    /// スナップショット全体を永続ストレージへ書き戻す。
    /// スクラッチへの書き込みを経由し、失敗はすべて呼び出し元へ返す。
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        let bytes = snapshot.to_json()?;
        fs::write(&self.scratch_path, &bytes).await.map_err(|e| {
            AppError::Persistence(format!(
                "failed to stage snapshot at {}: {e}",
                self.scratch_path.display()
            ))
        })?;
        self.storage.put(&self.bucket, &self.key, bytes).await
    }

    /// 候補を正規化してスナップショットへ上書き挿入する。永続化はしない。
    /// 正規化できない候補と許可リストに重なる候補は飛ばして続行する。
    pub fn add(&self, snapshot: &mut Snapshot, candidates: &[String], now: i64) -> AddReport {
        let mut report = AddReport::default();

        for raw in candidates {
            let net = match normalize(raw) {
                Ok(net) => net,
                Err(e) => {
                    warn!("rejected blocklist candidate: {e}");
                    report.rejected.push(raw.clone());
                    continue;
                }
            };
            if self.allowlist.overlaps(&net) {
                info!("skipping allow-listed network: {net}");
                report.skipped_allowed.push(net.to_string());
                continue;
            }
            snapshot.insert(net, now);
            report.added += 1;
        }

        report
    }

    /// 候補を正規化してスナップショットから取り除く。永続化はしない。
    pub fn delete(&self, snapshot: &mut Snapshot, candidates: &[String]) -> DeleteReport {
        let mut report = DeleteReport::default();

        for raw in candidates {
            let net = match normalize(raw) {
                Ok(net) => net,
                Err(e) => {
                    warn!("rejected blocklist candidate: {e}");
                    report.rejected.push(raw.clone());
                    continue;
                }
            };
            match snapshot.remove(&net) {
                Some(_) => report.removed += 1,
                None => {
                    info!("unknown key: {net}");
                    report.missing += 1;
                }
            }
        }

        report
    }
}
