pub mod registry;
pub mod runner;
pub mod scheduler;
