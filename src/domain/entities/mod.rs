pub mod outcome;
pub mod target;

pub use outcome::CheckOutcome;
pub use target::{CheckStatus, Target};
