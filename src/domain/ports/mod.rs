pub mod probe;
pub mod store;

pub use probe::{Probe, ProbeError};
pub use store::{StoreError, TargetStore};
