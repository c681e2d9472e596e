pub mod guards;
pub mod registry;
