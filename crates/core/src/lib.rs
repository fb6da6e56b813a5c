pub mod config;
pub mod error;
pub mod logging;

pub mod selection;
pub mod tree;

pub use config::{ResolverConfig, StaleIdPolicy};
pub use error::{Result, TaxonError, TreeError};
pub use selection::controller::{FetchTicket, SelectionController};
pub use selection::derive::{Derivation, effective_from_explicit, explicit_from_effective};
pub use selection::primary::{deepest_explicit, normalize_primary};
pub use selection::IdSet;
pub use tree::TreeIndex;
