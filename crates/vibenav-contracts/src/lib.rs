pub mod blueprint;
pub mod extract;
pub mod models;
pub mod prompt;
pub mod registry;
pub mod schema;
pub mod sections;
pub mod store;
