pub mod cvars;
pub mod renderer;
pub mod world;

pub mod components;
pub mod entities;

pub(crate) mod helpers;

pub use helpers::{ChangedSet, Stopwatch};
