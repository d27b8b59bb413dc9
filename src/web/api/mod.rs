pub mod bodies;
pub mod ephemeris;
pub mod error;
pub mod health;
pub mod orbits;
