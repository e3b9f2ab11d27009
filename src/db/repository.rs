//! The CRUD capability every entity store implements.

use crate::libs::error::{AppResult, EntityKind};

/// A persisted record with an optional database-assigned id.
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> Option<i64>;
}

/// Storage operations for one entity type.
///
/// `save` inserts when the entity has no id and updates otherwise; updating
/// an id that does not exist is `NotFound`. `find_all` returns entities in
/// creation order.
pub trait Repository<T: Entity> {
    fn save(&self, entity: T) -> AppResult<T>;
    fn find_by_id(&self, id: i64) -> AppResult<T>;
    fn find_all(&self) -> AppResult<Vec<T>>;
    fn delete(&self, id: i64) -> AppResult<()>;

    fn exists(&self, id: i64) -> AppResult<bool> {
        match self.find_by_id(id) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
