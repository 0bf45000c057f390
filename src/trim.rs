use crate::snapshot::Snapshot;
use ipnet::IpNet;

/// スナップショットを上限件数まで切り詰める。
/// 最終更新の古いエントリから削除し、残りをそのまま返す。
/// 同時刻のものはネットワーク順で決定的に落とす。
pub fn trim(snapshot: Snapshot, max_entries: usize) -> Snapshot {
    if snapshot.len() <= max_entries {
        return snapshot;
    }

    let mut entries: Vec<(IpNet, i64)> = snapshot.into_iter().collect();
    // 古い順 (同時刻はネットワーク順) に並べ、超過分を先頭から捨てる
    entries.sort_by_key(|&(net, ts)| (ts, net));
    let excess = entries.len() - max_entries;

    entries.into_iter().skip(excess).collect()
}
