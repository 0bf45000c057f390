use crate::error::AppError;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ある時点のブロックリスト全体。
/// キーは正規化済みネットワーク、値は最終更新のUNIX秒。
/// BTreeMapキーのIpNetはIPv4→IPv6、ファミリ内はアドレス昇順で並ぶ。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<IpNet, i64>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 永続形式(フラットなJSONオブジェクト)から復元する。
    pub fn from_json(bytes: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(bytes)
            .map_err(|e| AppError::StoreUnavailable(format!("snapshot decode failed: {e}")))
    }

    /// 永続形式へ整形出力する。
    pub fn to_json(&self) -> Result<Vec<u8>, AppError> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| AppError::Persistence(format!("snapshot encode failed: {e}")))
    }

    /// エントリを追加・上書きする。
    pub fn insert(&mut self, net: IpNet, last_modified: i64) {
        self.0.insert(net, last_modified);
    }

    /// エントリを削除し、存在した場合は旧タイムスタンプを返す。
    pub fn remove(&mut self, net: &IpNet) -> Option<i64> {
        self.0.remove(net)
    }

    pub fn get(&self, net: &IpNet) -> Option<i64> {
        self.0.get(net).copied()
    }

    pub fn contains(&self, net: &IpNet) -> bool {
        self.0.contains_key(net)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// (ネットワーク, 最終更新) を整列順で走査する。
    pub fn entries(&self) -> impl Iterator<Item = (&IpNet, &i64)> {
        self.0.iter()
    }
}

impl FromIterator<(IpNet, i64)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (IpNet, i64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Snapshot {
    type Item = (IpNet, i64);
    type IntoIter = std::collections::btree_map::IntoIter<IpNet, i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
