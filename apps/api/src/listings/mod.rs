// Job listings: criteria, filtering and pagination shared by search and alerts.

pub mod criteria;
pub mod filter;
pub mod handlers;
pub mod pagination;

#[cfg(test)]
pub(crate) mod test_support;
