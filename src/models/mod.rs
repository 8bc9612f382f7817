pub mod catalog;
pub mod deck;
pub mod preferences;
pub mod quote;
pub mod resolution;
pub mod variant;

pub use catalog::*;
pub use deck::*;
pub use preferences::*;
pub use quote::*;
pub use resolution::*;
pub use variant::*;
