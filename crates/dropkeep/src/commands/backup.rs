use crate::utils;
use colored::Colorize;

pub async fn handle(droplet: &str, snapshot: Option<&str>) -> anyhow::Result<()> {
    println!(
        "{}",
        format!("ドロップレット '{}' をバックアップ中...", droplet)
            .blue()
            .bold()
    );

    let lifecycle = utils::init_lifecycle(utils::Placement::default())?;
    let report = lifecycle
        .backup(droplet, snapshot)
        .await
        .map_err(utils::describe)?;

    if report.replaced_previous {
        println!(
            "  {} 既存のスナップショット '{}' を削除しました",
            "✓".green(),
            report.snapshot
        );
    }
    println!("  {} ドロップレットを停止しました", "✓".green());

    println!();
    println!(
        "{}",
        format!("✓ スナップショット '{}' を作成しました", report.snapshot)
            .green()
            .bold()
    );
    Ok(())
}
