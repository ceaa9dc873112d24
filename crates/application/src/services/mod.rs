mod message_store;
mod presence_reaper;
mod registry;

pub use message_store::MessageStore;
pub use presence_reaper::{PresenceReaper, ReaperConfig, SweepReport};
pub use registry::ParticipantRegistry;

#[cfg(test)]
mod message_store_tests;
#[cfg(test)]
mod registry_tests;
