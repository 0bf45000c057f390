pub mod allowlist;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod list;
pub mod normalize;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod trim;
