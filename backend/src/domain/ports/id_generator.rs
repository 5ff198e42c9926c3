//! Port for minting entity identifiers.

use uuid::Uuid;

/// Source of fresh identifiers.
///
/// Sequential listings rely on identifiers sorting by creation order.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    /// Return a new, unique identifier.
    fn next_id(&self) -> Uuid;
}

/// Time-ordered UUID version 7 generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}
