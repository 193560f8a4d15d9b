pub mod persistence;
pub mod probes;
