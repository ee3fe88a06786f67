//! `daybook delete`

use crate::config::ClientConfig;
use crate::error::ClientResult;

use super::open_scheduler;

pub async fn run(id: &str, config: &ClientConfig) -> ClientResult<()> {
    let scheduler = open_scheduler(config).await?;
    let plan = scheduler.remove(id).await?;
    if plan.remaining_siblings > 0 {
        println!(
            "Deleted {} ({} other event(s) in its repeat group kept)",
            plan.id, plan.remaining_siblings
        );
    } else {
        println!("Deleted {}", plan.id);
    }
    Ok(())
}
