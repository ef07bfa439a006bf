// Infrastructure layer modules
pub mod config;
pub mod credentials;
pub mod logging;
pub mod space_repository;

// Re-exports
pub use config::{CognitoConfig, ConfigError, SpacesTableConfig};
pub use credentials::{CognitoAuthService, CredentialsError, TemporaryCredentials};
pub use logging::init_logging;
pub use space_repository::{DynamoSpaceRepository, SpaceRepository, SpaceRepositoryError};
