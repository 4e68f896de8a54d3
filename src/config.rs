//! Service configuration read from the environment

use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::types::MarketComparison;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3030";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Journal directory; `None` keeps events in memory only
    pub data_dir: Option<PathBuf>,
    pub bind_addr: String,
    /// Page size used when a request gives no limit
    pub page_size: usize,
    /// Upper bound applied to requested limits
    pub max_page_size: usize,
    pub market: MarketComparison,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            market: MarketComparison::default(),
        }
    }
}

impl ServiceConfig {
    /// Read `HISTORY_*` variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        let data_dir = lookup("HISTORY_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(|dir| resolve_path(&current_dir, &dir));

        let bind_addr = lookup("HISTORY_BIND_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.bind_addr);

        let max_page_size = parse_size(&lookup, "HISTORY_MAX_PAGE_SIZE", defaults.max_page_size);
        let page_size = parse_size(&lookup, "HISTORY_PAGE_SIZE", defaults.page_size).min(max_page_size);

        Self {
            data_dir,
            bind_addr,
            page_size,
            max_page_size,
            market: defaults.market,
        }
    }

    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

fn resolve_path(current_dir: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        current_dir.join(path)
    }
}

fn parse_size<F>(lookup: &F, key: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                warn!(key, value = %raw, default, "ignoring invalid page size");
                default
            }
        },
    }
}
