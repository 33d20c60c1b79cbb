pub mod time_utils;
pub mod units;

pub use time_utils::TimeUtils;
pub use units::{describe_reading, format_hashrate};
