//! Traveller Forge - staged construction of Traveller weapons and robots

pub mod construction;
pub mod core;
pub mod gunsmith;
pub mod robots;
pub mod skills;
