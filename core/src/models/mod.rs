//! Data models: process records and the friendly-name rule table.

mod friendly;
mod record;

pub use friendly::{FriendlyRule, FriendlyRules};
pub use record::{PortStatus, ProcessRecord, Protocol};
