pub mod message;
pub mod participant;

pub use message::{Message, MessageType};
pub use participant::Participant;
