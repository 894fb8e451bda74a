use crate::utils;
use colored::Colorize;
use dropkeep_cloud::PowerStatus;

pub async fn handle(droplet: &str) -> anyhow::Result<()> {
    let lifecycle = utils::init_lifecycle(utils::Placement::default())?;
    let info = lifecycle.droplet(droplet).await.map_err(utils::describe)?;

    let status = match info.status {
        PowerStatus::Running => info.status.to_string().green(),
        PowerStatus::Off => info.status.to_string().yellow(),
        _ => info.status.to_string().dimmed(),
    };

    println!("{}", info.name.cyan().bold());
    println!("  ID:     {}", info.id);
    println!("  状態:   {}", status);
    println!("  IP:     {}", info.first_ipv4().unwrap_or("-"));
    Ok(())
}
