//! Shared types for the clave mines game.

pub mod mines;
