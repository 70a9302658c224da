pub mod cart;
pub mod catalog;
pub mod orders;
pub mod reports;
pub mod settings;
pub mod uploads;
