use crate::constants::{MAX_ENTRIES, SCRATCH_DIR};
use crate::error::AppError;
use crate::normalize::normalize;
use ipnet::IpNet;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// 永続ストレージバックエンドの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Http,
    Fs,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(StorageBackend::Http),
            "fs" => Ok(StorageBackend::Fs),
            other => Err(AppError::Config(format!(
                "unknown storageBackend: {other} (expected 'http' or 'fs')"
            ))),
        }
    }
}

/// 環境変数から組み立てるプロセス設定。
/// fileName・fileBucket・fileKeyは必須。storageBackendは省略時http。
#[derive(Debug, Clone)]
pub struct Config {
    pub file_name: String,
    pub bucket: String,
    pub key: String,
    pub endpoint: Option<String>,
    pub backend: StorageBackend,
    pub extra_allow_nets: Vec<IpNet>,
    pub max_entries: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let file_name = required_env("fileName")?;
        let bucket = required_env("fileBucket")?;
        let key = required_env("fileKey")?;

        let backend = match env::var("storageBackend") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::Http,
        };
        let endpoint = env::var("storageEndpoint").ok();
        if backend == StorageBackend::Http && endpoint.is_none() {
            return Err(AppError::Config(
                "storageEndpoint is required when storageBackend is http".to_string(),
            ));
        }

        let extra_allow_nets = match env::var("allowNets") {
            Ok(raw) => parse_allow_nets(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            file_name,
            bucket,
            key,
            endpoint,
            backend,
            extra_allow_nets,
            max_entries: MAX_ENTRIES,
        })
    }

    /// スナップショットの控えを置くローカルパス (/tmp/<fileName>)
    pub fn scratch_path(&self) -> PathBuf {
        PathBuf::from(SCRATCH_DIR).join(&self.file_name)
    }
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Config(format!("environment variable {name} is not set")))
}

/// allowNets環境変数をパースする。カンマまたは空白区切りで、
/// 裸のアドレスとCIDRの両方を受け付ける。不正な項目は起動エラー。
pub fn parse_allow_nets(raw: &str) -> Result<Vec<IpNet>, AppError> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize)
        .collect()
}
