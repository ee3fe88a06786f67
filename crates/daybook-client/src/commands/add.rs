//! `daybook add`

use daybook_core::{Event, slot_label};

use crate::cli::AddArgs;
use crate::config::ClientConfig;
use crate::error::ClientResult;

use super::open_scheduler;

pub async fn run(args: &AddArgs, config: &ClientConfig) -> ClientResult<()> {
    let scheduler = open_scheduler(config).await?;
    let created = scheduler.create(args.draft()).await?;
    println!("{}", summary(&created));
    Ok(())
}

/// Describes what a create wrote.
pub fn summary(created: &[Event]) -> String {
    match created {
        [] => "Nothing created.".to_string(),
        [event] if !event.is_grouped() => {
            format!("Created {} [{}] {}", event.title, event.id, slot_label(event))
        }
        [first, .., last] => format!(
            "Created {} occurrences of {} from {} to {} (group {})",
            created.len(),
            first.title,
            first.date,
            last.date,
            first.group_id().unwrap_or("-"),
        ),
        [event] => format!(
            "Created {} [{}] {} (group {})",
            event.title,
            event.id,
            slot_label(event),
            event.group_id().unwrap_or("-"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use daybook_core::{EventDraft, RepeatRule, parse_time};

    fn on(day: u32, id: &str, repeat: RepeatRule) -> Event {
        let date = NaiveDate::from_ymd_opt(2025, 9, day).unwrap();
        EventDraft::new(
            "Sync",
            date,
            parse_time("10:00").unwrap(),
            parse_time("11:00").unwrap(),
        )
        .to_event(id, date, repeat)
    }

    #[test]
    fn single_event() {
        insta::assert_snapshot!(
            summary(&[on(1, "e1", RepeatRule::none())]),
            @"Created Sync [e1] 2025-09-01 10:00-11:00"
        );
    }

    #[test]
    fn repeat_group() {
        let rule = RepeatRule::weekly(1).with_count(3).with_group_id("g1");
        let created = vec![
            on(1, "e1", rule.clone()),
            on(8, "e2", rule.clone()),
            on(15, "e3", rule),
        ];
        insta::assert_snapshot!(
            summary(&created),
            @"Created 3 occurrences of Sync from 2025-09-01 to 2025-09-15 (group g1)"
        );
    }

    #[test]
    fn group_cut_to_one_by_horizon() {
        let rule = RepeatRule::daily(1).with_group_id("g1");
        insta::assert_snapshot!(
            summary(&[on(30, "e1", rule)]),
            @"Created Sync [e1] 2025-09-30 10:00-11:00 (group g1)"
        );
    }
}
