pub mod checkin;
pub mod company;
pub mod enums;
pub mod person;
pub mod report;

pub use checkin::*;
pub use company::*;
pub use enums::*;
pub use person::*;
pub use report::*;
