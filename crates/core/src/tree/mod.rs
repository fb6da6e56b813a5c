//! Category tree snapshots: lookup index and flat-listing assembly.

pub mod assemble;
pub mod index;

pub use assemble::assemble_flat;
pub use index::TreeIndex;
