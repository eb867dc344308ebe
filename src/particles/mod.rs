pub mod body;
pub mod shape;

pub use body::*;
pub use shape::*;
