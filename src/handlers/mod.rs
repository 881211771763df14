pub mod admin;
pub mod bookings;
pub mod calendar;
pub mod catalog;
pub mod health;
pub mod portfolio;
pub mod slots;
