pub mod booking;
pub mod common;
pub mod matches;
pub mod request;
pub mod settings;
pub mod team;
pub mod tournament;
pub mod user;
