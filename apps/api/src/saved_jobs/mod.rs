pub mod handlers;
pub mod registry;
