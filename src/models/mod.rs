pub mod enums;
pub mod medication;
pub mod profile;
pub mod time_of_day;

pub use enums::*;
pub use medication::*;
pub use profile::*;
pub use time_of_day::*;
