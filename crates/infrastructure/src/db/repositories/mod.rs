pub mod message_repository_impl;
pub mod participant_repository_impl;

pub use message_repository_impl::PgMessageRepository;
pub use participant_repository_impl::PgParticipantRepository;

use domain::RepositoryError;

pub(crate) fn storage_error(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(err.to_string())
}
