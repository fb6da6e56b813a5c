pub mod category;
pub mod selection;

pub use category::*;
pub use selection::*;
