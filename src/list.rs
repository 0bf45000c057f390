use crate::snapshot::Snapshot;
use chrono::DateTime;

/// スナップショットを改行区切りの一覧へ整形する。
/// 並び順は (IPファミリ, ネットワーク) の昇順。空スナップショットは空文字列。
pub fn render(snapshot: &Snapshot, include_timestamp: bool) -> String {
    let lines: Vec<String> = snapshot
        .entries()
        .map(|(net, ts)| {
            if include_timestamp {
                format!("{} | {}", net, format_timestamp(*ts))
            } else {
                net.to_string()
            }
        })
        .collect();

    lines.join("\n")
}

/// UNIX秒をUTCの壁時計表記にする。表現できない値は秒数のまま返す。
fn format_timestamp(ts: i64) -> String {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}
