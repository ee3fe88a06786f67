//! `daybook expand`

use chrono::NaiveDate;
use daybook_core::{RepeatRule, expand_with_horizon, repeat_label};

use crate::cli::ExpandArgs;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

pub fn run(args: &ExpandArgs, config: &ClientConfig) -> ClientResult<()> {
    let rule = args.rule()?;
    let horizon = config.scheduler_config().horizon;
    println!("{}", render(args.date, &rule, horizon)?);
    Ok(())
}

/// Lists the dates `rule` generates from `anchor`, under a heading.
pub fn render(anchor: NaiveDate, rule: &RepeatRule, horizon: NaiveDate) -> ClientResult<String> {
    let dates = expand_with_horizon(anchor, rule, horizon)
        .map_err(|e| ClientError::Input(e.to_string()))?;
    let heading = repeat_label(rule).unwrap_or_else(|| "Does not repeat".to_string());
    let mut out = format!("{heading}: {} date(s)", dates.len());
    for date in dates {
        out.push_str(&format!("\n  {} {}", date, date.format("%a")));
    }
    Ok(out)
}
