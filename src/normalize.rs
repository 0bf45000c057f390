use crate::error::AppError;
use ipnet::IpNet;
use std::net::IpAddr;

/// 入力文字列を正規のCIDRネットワークへ変換する。
/// プレフィックス付き入力は非strict扱いでホストビットをマスクし、
/// 裸のアドレスはホストネットワーク(/32・/128)にする。
pub fn normalize(input: &str) -> Result<IpNet, AppError> {
    let trimmed = input.trim();

    // まずCIDR表記として解釈 (ホストビットはtruncで落とす)
    if let Ok(net) = trimmed.parse::<IpNet>() {
        return Ok(net.trunc());
    }

    // プレフィックスなしの裸アドレス
    match trimmed.parse::<IpAddr>() {
        Ok(addr) => Ok(IpNet::from(addr)),
        Err(_) => Err(AppError::InvalidAddress(input.to_string())),
    }
}

/// 正規化したネットワークの文字列表現を返す。
pub fn normalize_to_string(input: &str) -> Result<String, AppError> {
    normalize(input).map(|net| net.to_string())
}
