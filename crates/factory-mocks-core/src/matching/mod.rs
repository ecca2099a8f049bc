//! Request matching utilities.

mod payload;
mod query;
mod url;

pub use payload::payload_matches;
pub use query::{params_match, parse_query_string};
pub use url::url_matches;
