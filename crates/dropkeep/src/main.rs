mod commands;
mod utils;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dropkeep")]
#[command(about = "ドロップレットをスナップショットで守る。", long_about = None)]
struct Cli {
    /// デバッグログを表示
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// ドロップレットを停止してスナップショットを作成
    Backup {
        /// ドロップレット名
        droplet: String,
        /// スナップショット名（省略時は <ドロップレット名>_snapshot）
        #[arg(short, long)]
        snapshot: Option<String>,
    },
    /// スナップショットからドロップレットを作成
    Restore {
        /// 作成するドロップレット名
        droplet: String,
        /// スナップショット名（省略時は <ドロップレット名>_snapshot）
        #[arg(short, long)]
        snapshot: Option<String>,
        /// リージョン（省略時は設定ファイル、なければ nyc3）
        #[arg(long, env = "DROPKEEP_REGION")]
        region: Option<String>,
        /// サイズ（省略時は設定ファイル、なければ 512mb）
        #[arg(long, env = "DROPKEEP_SIZE")]
        size: Option<String>,
    },
    /// ドロップレットを削除（スナップショットは作成しない）
    Destroy {
        /// ドロップレット名
        droplet: String,
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// プライベートスナップショットの一覧を表示
    Snapshots,
    /// 登録済みSSHキーの一覧を表示
    Keys,
    /// ドロップレットの状態を表示
    Show {
        /// ドロップレット名
        droplet: String,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrに出力（RUST_LOG が優先）
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Backup { droplet, snapshot } => {
            commands::backup::handle(&droplet, snapshot.as_deref()).await?;
        }
        Commands::Restore {
            droplet,
            snapshot,
            region,
            size,
        } => {
            let placement = utils::Placement { region, size };
            commands::restore::handle(&droplet, snapshot.as_deref(), placement).await?;
        }
        Commands::Destroy { droplet, yes } => {
            commands::destroy::handle(&droplet, yes).await?;
        }
        Commands::Snapshots => {
            commands::snapshots::handle().await?;
        }
        Commands::Keys => {
            commands::keys::handle().await?;
        }
        Commands::Show { droplet } => {
            commands::show::handle(&droplet).await?;
        }
        Commands::Version => {
            println!("dropkeep {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
