pub mod show;
pub mod stats;
