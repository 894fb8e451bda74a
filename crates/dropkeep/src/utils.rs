use dropkeep_cloud::{CloudError, DropletLifecycle, LifecycleConfig, TracingReporter, WaitConfig};
use dropkeep_cloud_digitalocean::DigitalOceanProvider;
use dropkeep_config::Settings;
use std::sync::Arc;
use std::time::Duration;

/// コマンドラインで指定された配置（未指定なら設定ファイルの値）
#[derive(Debug, Default, Clone)]
pub struct Placement {
    pub region: Option<String>,
    pub size: Option<String>,
}

/// 設定とコマンドライン指定からライフサイクル設定を組み立てる
///
/// 優先順位: フラグ / 環境変数 > 設定ファイル > デフォルト
pub fn lifecycle_config(settings: &Settings, placement: Placement) -> LifecycleConfig {
    LifecycleConfig {
        region: placement.region.unwrap_or_else(|| settings.region.clone()),
        size: placement.size.unwrap_or_else(|| settings.size.clone()),
        wait: WaitConfig {
            initial_interval: Duration::from_secs(settings.poll_interval_secs.max(1)),
            timeout: Duration::from_secs(settings.timeout_secs),
            ..WaitConfig::default()
        },
    }
}

/// トークンと設定を読み込み、DigitalOcean向けのライフサイクルを作成
pub fn init_lifecycle(placement: Placement) -> anyhow::Result<DropletLifecycle<DigitalOceanProvider>> {
    let token = dropkeep_config::find_token()?;
    let settings = Settings::load()?;
    let config = lifecycle_config(&settings, placement);
    tracing::debug!(
        "region={} size={} timeout={:?}",
        config.region,
        config.size,
        config.wait.timeout
    );

    Ok(DropletLifecycle::new(
        DigitalOceanProvider::new(token),
        config,
        Arc::new(TracingReporter),
    ))
}

/// 見つからなかった場合のメッセージを整える
pub fn describe(err: CloudError) -> anyhow::Error {
    match err {
        CloudError::DropletNotFound(name) => {
            anyhow::anyhow!("ドロップレット '{}' が見つかりません", name)
        }
        CloudError::NoSnapshotAvailable => {
            anyhow::anyhow!("復元に使えるプライベートスナップショットがありません")
        }
        CloudError::NoSshKey => anyhow::anyhow!("SSHキーが登録されていません"),
        e @ CloudError::OperationTimedOut { .. } => anyhow::anyhow!(
            "{}\nヒント: プロバイダー側の処理は継続している可能性があります。状態を確認してから再実行してください",
            e
        ),
        e => e.into(),
    }
}
