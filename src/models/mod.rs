pub mod account;
pub mod replay;

pub use account::Account;
pub use replay::{NewParticipant, NewReplay, Participant, Replay};
