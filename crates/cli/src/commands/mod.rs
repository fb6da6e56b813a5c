pub mod derive;
pub mod primary;
pub mod restore;
pub mod schema;
pub mod tree;
