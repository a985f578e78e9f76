mod booking;
mod matches;
mod request;
mod settings;
mod team;
mod tournament;
mod user;

pub use booking::{Booking, PaymentStatus};
pub use matches::{Match, MatchStatus};
pub use request::{Request, RequestStatus, RequestType};
pub use settings::PlatformSettings;
pub use team::Team;
pub use tournament::{ParticipantKind, Tournament, TournamentStatus};
pub use user::{Role, User};
