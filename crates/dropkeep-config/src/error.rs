use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("設定ディレクトリが見つかりません")]
    ConfigDirNotFound,

    #[error(
        "DigitalOcean の API トークンが見つかりません。以下のいずれかで指定してください:\n\
        - 環境変数 DO_KEY\n\
        - カレントディレクトリの digitalocean.token\n\
        - ~/.config/dropkeep/digitalocean.token\n\
        トークンは https://cloud.digitalocean.com/account/api/tokens で発行できます"
    )]
    TokenNotFound,

    #[error("設定ファイルの読み込みに失敗しました: {path}\n理由: {source}")]
    InvalidSettings {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
