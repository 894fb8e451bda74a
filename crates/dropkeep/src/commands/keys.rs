use crate::utils;
use colored::Colorize;

pub async fn handle() -> anyhow::Result<()> {
    let lifecycle = utils::init_lifecycle(utils::Placement::default())?;
    let keys = lifecycle.ssh_keys().await?;

    if keys.is_empty() {
        println!("{}", "ℹ SSHキーは登録されていません".dimmed());
        return Ok(());
    }

    println!("{}", format!("SSHキー ({} 個):", keys.len()).bold());
    for (index, key) in keys.iter().enumerate() {
        // restore は常に先頭のキーを使う
        let marker = if index == 0 {
            "*".green()
        } else {
            " ".normal()
        };
        println!(
            "  {} {:<24} {:>10}  {}",
            marker,
            key.name,
            key.id,
            key.fingerprint.dimmed()
        );
    }
    Ok(())
}
