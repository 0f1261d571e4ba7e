pub mod field;
pub mod id;
pub mod kind;

pub use field::*;
pub use id::*;
pub use kind::*;
