//! Repository layer: entity-scoped database operations.

mod medication;
mod missed_dose;
mod preference;
mod profile;

pub use medication::*;
pub use missed_dose::*;
pub use preference::*;
pub use profile::*;
