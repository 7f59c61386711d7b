pub mod user;
pub mod movie;
pub mod seat;
pub mod booking;

pub use user::{ContactDetails, Principal, UserProfile};
pub use movie::{Movie, MovieStatus, Showtime, Theatre};
pub use seat::{Seat, SeatTier};
pub use booking::{BookingRecord, BookingStatus, PaymentStatus, ShowContext};
