// Job alerts: stored criteria re-evaluated on demand with the listing predicate.

pub mod handlers;
pub mod matcher;
