use crate::utils;
use colored::Colorize;

pub async fn handle(droplet: &str, yes: bool) -> anyhow::Result<()> {
    if !yes {
        println!(
            "{}",
            format!("⚠ 警告: ドロップレット '{}' を完全に削除します", droplet)
                .red()
                .bold()
        );
        println!("  スナップショットは作成されません。先に 'dropkeep backup' を実行してください。");
        println!("  実行するには --yes を指定してください。");
        return Ok(());
    }

    println!(
        "{}",
        format!("ドロップレット '{}' を削除中...", droplet)
            .yellow()
            .bold()
    );

    let lifecycle = utils::init_lifecycle(utils::Placement::default())?;
    lifecycle.destroy(droplet).await.map_err(utils::describe)?;

    println!();
    println!(
        "{}",
        format!("✓ ドロップレット '{}' を削除しました", droplet)
            .green()
            .bold()
    );
    Ok(())
}
