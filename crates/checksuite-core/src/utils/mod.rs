pub mod hasher;
pub mod strings;

pub use strings::{format_list, format_percent, truncate_string};
