pub mod availability;
pub mod booking;
pub mod portfolio;
pub mod service;

pub use availability::{BusinessHours, BusinessWindow};
pub use booking::{
    BookedInterval, BookedIntervalResponse, Booking, BookingSubmission, UserInfo, ValidatedBooking,
};
pub use portfolio::PortfolioImage;
pub use service::{Service, ServiceSelection};
