use crate::utils;
use colored::Colorize;

pub async fn handle() -> anyhow::Result<()> {
    let lifecycle = utils::init_lifecycle(utils::Placement::default())?;
    let snapshots = lifecycle.snapshots().await?;

    if snapshots.is_empty() {
        println!("{}", "ℹ プライベートスナップショットはありません".dimmed());
        return Ok(());
    }

    println!("{}", format!("スナップショット ({} 個):", snapshots.len()).bold());
    for image in snapshots {
        let created = image
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} {:<32} {:>12}  {}",
            "■".cyan(),
            image.name,
            image.id,
            created.dimmed()
        );
    }
    Ok(())
}
