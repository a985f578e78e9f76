//! Rules that do not need the database. Repositories call into these inside
//! their transactions so the same checks apply on every write path.

pub mod access;
pub mod fixtures;
pub mod match_state;
pub mod participants;
pub mod payments;
pub mod request_lifecycle;
pub mod status;
