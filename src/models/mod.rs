pub mod appointment;
pub mod enums;
pub mod medical_history;
pub mod patient;
pub mod snapshot;

pub use appointment::*;
pub use medical_history::*;
pub use patient::*;
pub use snapshot::*;
