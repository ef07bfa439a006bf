// Domain layer modules
pub mod authorization;
pub mod space;

// Re-exports
pub use authorization::is_authorized;
pub use space::{Space, SpaceDraft, SpaceUpdate, SpaceValidationError};
