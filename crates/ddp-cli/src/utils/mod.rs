//! Interactive terminal helpers.

pub mod input;
