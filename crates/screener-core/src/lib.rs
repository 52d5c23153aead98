pub mod criteria;
pub mod error;
pub mod types;

pub use criteria::*;
pub use error::*;
pub use types::*;
