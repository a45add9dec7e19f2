mod constants;
mod delta;
mod error;
mod row;
mod variant;

pub use constants::*;
pub use delta::*;
pub use error::*;
pub use row::*;
pub use variant::*;

#[cfg(test)]
mod tests;
