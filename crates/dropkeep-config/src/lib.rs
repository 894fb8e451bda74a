pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// トークンを保持する環境変数
pub const TOKEN_ENV: &str = "DO_KEY";
/// トークンファイル名
pub const TOKEN_FILE: &str = "digitalocean.token";
/// 設定ファイルパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "DROPKEEP_CONFIG";
const SETTINGS_FILE: &str = "config.yaml";

/// Dropkeepの設定ディレクトリ (~/.config/dropkeep) を取得
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("dropkeep"))
}

/// DigitalOcean の API トークンを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 DO_KEY
/// 2. カレントディレクトリの digitalocean.token
/// 3. ~/.config/dropkeep/digitalocean.token
///
/// 空文字列のトークンは未指定として扱う
pub fn find_token() -> Result<String> {
    let current_dir = std::env::current_dir()?;
    let config_dir = get_config_dir().ok();
    find_token_from(&current_dir, config_dir.as_deref())
}

/// 検索ディレクトリを指定してトークンを探す
pub fn find_token_from(current_dir: &Path, config_dir: Option<&Path>) -> Result<String> {
    // 1. 環境変数
    if let Ok(token) = std::env::var(TOKEN_ENV) {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    // 2. カレントディレクトリ → 3. 設定ディレクトリ
    let candidates = std::iter::once(current_dir).chain(config_dir);
    for dir in candidates {
        let path = dir.join(TOKEN_FILE);
        if !path.is_file() {
            continue;
        }
        let content = std::fs::read_to_string(&path)?;
        let token = content.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    Err(ConfigError::TokenNotFound)
}

/// ユーザー設定 (config.yaml)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 新規ドロップレットのリージョン
    pub region: String,
    /// 新規ドロップレットのサイズ
    pub size: String,
    /// ステータス確認の間隔（秒）
    pub poll_interval_secs: u64,
    /// 非同期操作の待機上限（秒）
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: "nyc3".to_string(),
            size: "512mb".to_string(),
            poll_interval_secs: 5,
            timeout_secs: 600,
        }
    }
}

impl Settings {
    /// 設定ファイルのパスを決定
    ///
    /// 環境変数 DROPKEEP_CONFIG が優先、なければ ~/.config/dropkeep/config.yaml
    pub fn path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(get_config_dir()?.join(SETTINGS_FILE))
    }

    /// 設定を読み込む。ファイルがなければデフォルト値
    pub fn load() -> Result<Self> {
        match Self::path() {
            Ok(path) => Self::load_from(&path),
            Err(ConfigError::ConfigDirNotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// 指定パスから設定を読み込む
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::InvalidSettings {
            path: path.to_path_buf(),
            source,
        })
    }
}
