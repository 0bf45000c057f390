use crate::constants::DEFAULT_ALLOW_NETS;
use crate::normalize::normalize;
use ipnet::IpNet;
use once_cell::sync::Lazy;

// 既定テーブルはパース済みで一度だけ保持する
static DEFAULT_NETS: Lazy<Vec<IpNet>> = Lazy::new(|| {
    DEFAULT_ALLOW_NETS
        .iter()
        .filter_map(|s| s.parse::<IpNet>().ok())
        .collect()
});

/// ブロック対象から除外するネットワークの固定テーブル。
/// プロセス起動時に一度だけ構築し、以後は変更しない。
#[derive(Debug, Clone)]
pub struct AllowList {
    nets: Vec<IpNet>,
}

impl AllowList {
    /// 既定テーブルに追加ネットワークをマージして構築する。
    pub fn new(extra: &[IpNet]) -> Self {
        let mut nets = DEFAULT_NETS.clone();
        nets.extend_from_slice(extra);
        Self { nets }
    }

    /// テーブルを丸ごと指定して構築する。
    pub fn from_nets(nets: Vec<IpNet>) -> Self {
        Self { nets }
    }

    /// 候補ネットワークが許可リストのいずれかと範囲を共有するか。
    /// 完全一致や包含だけでなく、部分的な重なりも除外対象。
    pub fn overlaps(&self, candidate: &IpNet) -> bool {
        self.nets
            .iter()
            .any(|allowed| nets_overlap(allowed, candidate))
    }

    /// 文字列候補の判定。正規化できない入力はfalse (= 除外しない)。
    pub fn is_allowed(&self, candidate: &str) -> bool {
        match normalize(candidate) {
            Ok(net) => self.overlaps(&net),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }
}

/// CIDRブロック同士は、重なるなら必ず一方がもう一方を包含する。
fn nets_overlap(a: &IpNet, b: &IpNet) -> bool {
    match (a, b) {
        (IpNet::V4(x), IpNet::V4(y)) => x.contains(y) || y.contains(x),
        (IpNet::V6(x), IpNet::V6(y)) => x.contains(y) || y.contains(x),
        _ => false,
    }
}
