//! Listing module: turning a remote index into work items.

pub mod discover;
pub mod item;
pub mod parser;

pub use discover::{discover, discover_from_file, discover_from_listing};
pub use item::WorkItem;
pub use parser::{derive_name, extract_hrefs, parse_listing, parse_url_list};
