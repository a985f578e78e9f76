pub mod bookings;
pub mod health;
pub mod matches;
pub mod requests;
pub mod settings;
pub mod teams;
pub mod tournaments;
pub mod users;
