//! Core types for daybook: events, repeat expansion, overlap detection,
//! repeat-group policy, filtering and text rendering.
//!
//! Everything here is synchronous and free of I/O. Persistence lives in
//! `daybook-store`, orchestration and alerts in `daybook-server`.

pub mod error;
pub mod event;
pub mod filter;
pub mod format;
pub mod group;
pub mod overlap;
pub mod repeat;
pub mod time;
pub mod tracing;

pub use error::{ValidationError, ValidationResult};
pub use event::{Event, EventDraft, RepeatEnd, RepeatRule, RepeatType};
pub use filter::{View, filter_events, matches_term, month_range, week_range};
pub use format::{
    FormatOptions, alert_message, conflict_line, conflict_message, ellipsis, event_block,
    notification_label, repeat_label, slot_label,
};
pub use group::{
    CreatePlan, DeletePlan, EditPlan, new_id, plan_create, plan_create_with, plan_delete,
    plan_edit, siblings,
};
pub use overlap::{Collision, find_conflicts, first_conflict};
pub use repeat::{DEFAULT_HORIZON, MAX_SCAN_STEPS, expand, expand_with_horizon};
pub use time::{AlertWindow, Slot, format_time, parse_date, parse_time};
pub use tracing::{LogFormat, TracingConfig, TracingError, init_tracing};
