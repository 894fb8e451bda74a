use crate::utils;
use colored::Colorize;

pub async fn handle(
    droplet: &str,
    snapshot: Option<&str>,
    placement: utils::Placement,
) -> anyhow::Result<()> {
    println!(
        "{}",
        format!("ドロップレット '{}' を復元中...", droplet).blue().bold()
    );

    let lifecycle = utils::init_lifecycle(placement)?;
    println!(
        "  リージョン: {}  サイズ: {}",
        lifecycle.config().region.cyan(),
        lifecycle.config().size.cyan()
    );

    let report = lifecycle
        .restore(droplet, snapshot)
        .await
        .map_err(utils::describe)?;

    if report.fell_back {
        let requested = dropkeep_cloud::snapshot_name_for(droplet, snapshot);
        println!(
            "  {} スナップショット '{}' が見つからないため '{}' を使用しました",
            "⚠".yellow(),
            requested,
            report.snapshot.name
        );
    } else {
        println!(
            "  {} スナップショット: {}",
            "✓".green(),
            report.snapshot.name
        );
    }

    println!();
    println!(
        "{}",
        format!("✓ ドロップレット '{}' を作成しました", droplet)
            .green()
            .bold()
    );
    println!("  IP: {}", report.ipv4.cyan());
    Ok(())
}
