/// 定数の共通化

/// ブロックリストが保持できるエントリ数の上限。
/// 超過分はtrimで最終更新の古い順に削除される。
pub const MAX_ENTRIES: usize = 50_000;

/// スナップショットのステージング先ディレクトリ。
pub const SCRATCH_DIR: &str = "/tmp";

/// 既定の許可リスト。プライベート・ループバック・リンクローカル等、
/// ブロック対象にしてはならないネットワーク。
pub const DEFAULT_ALLOW_NETS: &[&str] = &[
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "::1/128",
    "fc00::/7",
    "fe80::/10",
];
