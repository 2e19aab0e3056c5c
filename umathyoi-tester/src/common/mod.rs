pub mod util;

pub use util::{report_timestamp, split_csv, split_pair};
