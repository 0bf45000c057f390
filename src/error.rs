use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // IOまわりのエラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ネットワーク関係のエラー (reqwest 等)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    // IPアドレスにもCIDRにも解釈できない入力
    #[error("Invalid address or network: {0}")]
    InvalidAddress(String),

    // 永続スナップショットが取得できない・内容が壊れている場合
    #[error("Blocklist store unavailable: {0}")]
    StoreUnavailable(String),

    // ステージング書き込みやアップロードの失敗
    #[error("Failed to persist blocklist: {0}")]
    Persistence(String),

    // リクエストボディなどの不正入力
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // 環境変数設定の不備
    #[error("Configuration error: {0}")]
    Config(String),
}
