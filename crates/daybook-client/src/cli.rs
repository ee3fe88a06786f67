//! Command-line interface definition.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};

use daybook_core::{EventDraft, RepeatRule, RepeatType, View, parse_date, parse_time};

use crate::config::StoreKind;
use crate::error::{ClientError, ClientResult};

/// daybook - calendar events with repeats, overlap checks and alerts
#[derive(Debug, Parser)]
#[command(name = "daybook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "DAYBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    // --- Store flags ---
    /// Event store backend
    #[arg(long, value_enum, env = "DAYBOOK_STORE")]
    pub store: Option<StoreKind>,

    /// JSON file used by the file store
    #[arg(long, env = "DAYBOOK_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Base URL of the HTTP store
    #[arg(long, env = "DAYBOOK_SERVER_URL")]
    pub server_url: Option<String>,

    /// Last date generated for open-ended repeats (YYYY-MM-DD)
    #[arg(long, value_parser = date_arg)]
    pub horizon: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List events
    List(ListArgs),

    /// Add an event, or a repeat group when --repeat is given
    Add(AddArgs),

    /// Edit an event; a repeating event leaves its group
    Edit(EditArgs),

    /// Delete one event; repeat siblings are kept
    Delete {
        /// Event id
        id: String,
    },

    /// Print the dates a repeat rule would generate, without saving
    Expand(ExpandArgs),

    /// Watch events and raise alerts until interrupted
    Watch(WatchArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `daybook list`
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only events whose title, description, location or category contain this
    #[arg(long, short)]
    pub query: Option<String>,

    /// Only the Sunday-to-Saturday week containing this date
    #[arg(long, value_parser = date_arg, group = "view")]
    pub week: Option<NaiveDate>,

    /// Only the month containing this date
    #[arg(long, value_parser = date_arg, group = "view")]
    pub month: Option<NaiveDate>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show event ids
    #[arg(long)]
    pub ids: bool,

    /// Maximum title length (truncated with ellipsis)
    #[arg(long)]
    pub max_title_length: Option<usize>,
}

impl ListArgs {
    pub fn view(&self) -> View {
        match (self.week, self.month) {
            (Some(date), _) => View::Week(date),
            (None, Some(date)) => View::Month(date),
            (None, None) => View::All,
        }
    }
}

/// Repeat unit accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepeatArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<RepeatArg> for RepeatType {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Daily => RepeatType::Daily,
            RepeatArg::Weekly => RepeatType::Weekly,
            RepeatArg::Monthly => RepeatType::Monthly,
            RepeatArg::Yearly => RepeatType::Yearly,
        }
    }
}

/// Repeat options shared by `add` and `expand`.
#[derive(Debug, Args)]
pub struct RepeatArgs {
    /// Repeat unit
    #[arg(long, value_enum)]
    pub repeat: Option<RepeatArg>,

    /// Step between occurrences, in repeat units
    #[arg(long, default_value = "1", allow_negative_numbers = true)]
    pub interval: i32,

    /// Last date to generate (YYYY-MM-DD)
    #[arg(long, value_parser = date_arg)]
    pub until: Option<NaiveDate>,

    /// Total number of occurrences
    #[arg(long)]
    pub count: Option<u32>,
}

impl RepeatArgs {
    /// Builds the rule; no `--repeat` means a one-off event.
    pub fn rule(&self) -> RepeatRule {
        let Some(unit) = self.repeat else {
            return RepeatRule::none();
        };
        let mut rule = RepeatRule::new(unit.into(), self.interval);
        if let Some(until) = self.until {
            rule = rule.with_end_date(until);
        }
        if let Some(count) = self.count {
            rule = rule.with_count(count);
        }
        rule
    }
}

/// `daybook add`
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Event title
    pub title: String,

    /// Date (YYYY-MM-DD)
    #[arg(long, value_parser = date_arg)]
    pub date: NaiveDate,

    /// Start time (HH:MM)
    #[arg(long, value_parser = time_arg)]
    pub start: NaiveTime,

    /// End time (HH:MM)
    #[arg(long, value_parser = time_arg)]
    pub end: NaiveTime,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub location: String,

    #[arg(long, default_value = "")]
    pub category: String,

    /// Minutes before start to alert; 0 disables
    #[arg(long, default_value = "10")]
    pub notify: u32,

    #[command(flatten)]
    pub repeat: RepeatArgs,
}

impl AddArgs {
    pub fn draft(&self) -> EventDraft {
        EventDraft::new(self.title.clone(), self.date, self.start, self.end)
            .with_description(self.description.clone())
            .with_location(self.location.clone())
            .with_category(self.category.clone())
            .with_notification(self.notify)
            .with_repeat(self.repeat.rule())
    }
}

/// `daybook edit`. Fields not given keep their current value.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Event id
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,

    #[arg(long, value_parser = time_arg)]
    pub start: Option<NaiveTime>,

    #[arg(long, value_parser = time_arg)]
    pub end: Option<NaiveTime>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub notify: Option<u32>,
}

impl EditArgs {
    /// Overlays the given fields on `base`.
    pub fn apply(&self, mut base: EventDraft) -> EventDraft {
        if let Some(title) = &self.title {
            base.title = title.clone();
        }
        if let Some(date) = self.date {
            base.date = date;
        }
        if let Some(start) = self.start {
            base.start_time = start;
        }
        if let Some(end) = self.end {
            base.end_time = end;
        }
        if let Some(description) = &self.description {
            base.description = description.clone();
        }
        if let Some(location) = &self.location {
            base.location = location.clone();
        }
        if let Some(category) = &self.category {
            base.category = category.clone();
        }
        if let Some(minutes) = self.notify {
            base.notification_time = minutes;
        }
        base
    }
}

/// `daybook expand`
#[derive(Debug, Args)]
pub struct ExpandArgs {
    /// Anchor date (YYYY-MM-DD)
    #[arg(value_parser = date_arg)]
    pub date: NaiveDate,

    #[command(flatten)]
    pub repeat: RepeatArgs,
}

impl ExpandArgs {
    pub fn rule(&self) -> ClientResult<RepeatRule> {
        if self.repeat.repeat.is_none() {
            return Err(ClientError::Input("expand needs --repeat".into()));
        }
        Ok(self.repeat.rule())
    }
}

/// `daybook watch`
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Send desktop notifications instead of logging alerts
    #[arg(long)]
    pub desktop: bool,

    /// Seconds between alert checks
    #[arg(long)]
    pub tick: Option<u64>,

    /// Seconds between store reloads
    #[arg(long)]
    pub reload: Option<u64>,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Show configuration file path
    Path,
}

fn date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_date(raw).ok_or_else(|| format!("expected YYYY-MM-DD, got {raw:?}"))
}

fn time_arg(raw: &str) -> Result<NaiveTime, String> {
    parse_time(raw).ok_or_else(|| format!("expected HH:MM, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("daybook").chain(args.iter().copied())).unwrap()
    }

    mod add {
        use super::*;

        #[test]
        fn one_off_event() {
            let cli = parse(&[
                "add", "Standup", "--date", "2025-10-15", "--start", "09:00", "--end", "09:15",
            ]);
            let Command::Add(args) = cli.command else {
                panic!("expected add");
            };
            let draft = args.draft();
            assert_eq!(draft.title, "Standup");
            assert_eq!(draft.notification_time, 10);
            assert!(!draft.repeat.is_repeating());
        }

        #[test]
        fn repeat_options() {
            let cli = parse(&[
                "add", "Sync", "--date", "2025-09-01", "--start", "10:00", "--end", "11:00",
                "--repeat", "weekly", "--interval", "2", "--count", "3",
            ]);
            let Command::Add(args) = cli.command else {
                panic!("expected add");
            };
            let rule = args.repeat.rule();
            assert_eq!(rule.kind, RepeatType::Weekly);
            assert_eq!(rule.interval, 2);
            assert_eq!(rule.count, Some(3));
        }

        #[test]
        fn rejects_bad_time() {
            let result = Cli::try_parse_from([
                "daybook", "add", "X", "--date", "2025-10-15", "--start", "9am", "--end", "10:00",
            ]);
            assert!(result.is_err());
        }
    }

    mod list {
        use super::*;

        #[test]
        fn week_and_month_are_exclusive() {
            let result = Cli::try_parse_from([
                "daybook",
                "list",
                "--week",
                "2025-10-15",
                "--month",
                "2025-10-01",
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn view_selection() {
            let cli = parse(&["list", "--week", "2025-10-15"]);
            let Command::List(args) = cli.command else {
                panic!("expected list");
            };
            assert_eq!(
                args.view(),
                View::Week(NaiveDate::from_ymd_opt(2025, 10, 15).unwrap())
            );
        }
    }

    #[test]
    fn edit_overlays_only_given_fields() {
        let cli = parse(&["edit", "abc", "--title", "Renamed", "--end", "11:30"]);
        let Command::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        let date = NaiveDate::from_ymd_opt(2025, 10, 15).unwrap();
        let base = EventDraft::new(
            "Old",
            date,
            parse_time("10:00").unwrap(),
            parse_time("11:00").unwrap(),
        )
        .with_location("Room 1");

        let draft = args.apply(base);
        assert_eq!(draft.title, "Renamed");
        assert_eq!(draft.location, "Room 1");
        assert_eq!(draft.end_time, parse_time("11:30").unwrap());
    }

    #[test]
    fn expand_requires_repeat() {
        let cli = parse(&["expand", "2025-09-15"]);
        let Command::Expand(args) = cli.command else {
            panic!("expected expand");
        };
        assert!(args.rule().is_err());
    }

    #[test]
    fn negative_interval_reaches_validation() {
        let cli = parse(&["expand", "2025-09-15", "--repeat", "daily", "--interval", "-1"]);
        let Command::Expand(args) = cli.command else {
            panic!("expected expand");
        };
        assert!(args.rule().unwrap().validate().is_err());
    }
}
