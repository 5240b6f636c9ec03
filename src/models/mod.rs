pub mod booking;
pub mod document;

pub use booking::NewBooking;
pub use document::Document;
