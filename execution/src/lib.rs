pub mod mines;

pub use mines::{GameRng, Session, SessionConfig};
