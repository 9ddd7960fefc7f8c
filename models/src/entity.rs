// models/src/entity.rs

use crate::errors::EntityKind;

/// Anything stored in an entity collection, keyed by a unique string id.
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}
