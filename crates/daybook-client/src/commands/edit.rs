//! `daybook edit`

use daybook_core::{EditPlan, slot_label};
use daybook_server::SchedulerError;

use crate::cli::EditArgs;
use crate::config::ClientConfig;
use crate::error::ClientResult;

use super::open_scheduler;

pub async fn run(args: &EditArgs, config: &ClientConfig) -> ClientResult<()> {
    let scheduler = open_scheduler(config).await?;
    let current = scheduler
        .snapshot()
        .await
        .iter()
        .find(|event| event.id == args.id)
        .map(|event| event.to_draft())
        .ok_or_else(|| SchedulerError::not_found(&args.id))?;

    let plan = scheduler.update(&args.id, args.apply(current)).await?;
    println!("{}", summary(&plan));
    Ok(())
}

/// Describes what an edit wrote.
pub fn summary(plan: &EditPlan) -> String {
    let Some(edited) = plan.edited() else {
        return "Nothing updated.".to_string();
    };
    let line = format!("Updated {} [{}] {}", edited.title, edited.id, slot_label(edited));
    match plan {
        EditPlan::Single(_) => line,
        EditPlan::Dissolve {
            group_id, events, ..
        } => {
            let others = events.len().saturating_sub(1);
            format!("{line}\nRepeat group {group_id} dissolved; {others} other event(s) are now standalone")
        }
    }
}
