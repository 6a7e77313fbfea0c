pub mod checkins;
pub mod companies;
pub mod health;
pub mod persons;
pub mod reports;
pub mod upload;
