pub mod completion;
pub mod matcher;
pub mod resolve;

pub use completion::{resolve_token, TabResolution, TabToken};
pub use resolve::{find_matches, MatchOptions, MatchResult, MatchTier};
