//! In-memory object store
//!
//! Holds the same encoded bytes the on-disk database would write (minus the
//! compression), so loads go through the same integrity check. Data is lost when
//! the store is dropped.

use crate::areas::database::ObjectStore;
use crate::artifacts::objects::object::RawObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Result, StoreError};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemoryDatabase {
    objects: Mutex<HashMap<ObjectId, Bytes>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects().map(|objects| objects.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn objects(&self) -> Result<MutexGuard<'_, HashMap<ObjectId, Bytes>>> {
        self.objects
            .lock()
            .map_err(|error| std::io::Error::other(format!("lock poisoned: {error}")).into())
    }
}

impl ObjectStore for MemoryDatabase {
    fn store(&self, kind: ObjectType, payload: Bytes) -> Result<ObjectId> {
        let object = RawObject::new(kind, payload);
        let oid = object.object_id();

        self.objects()?
            .entry(oid.clone())
            .or_insert_with(|| object.encode());

        Ok(oid)
    }

    fn load(&self, oid: &ObjectId) -> Result<RawObject> {
        let objects = self.objects()?;
        let content = objects
            .get(oid)
            .ok_or_else(|| StoreError::NotFound(oid.clone()))?;

        RawObject::decode(oid, content)
    }

    fn contains(&self, oid: &ObjectId) -> Result<bool> {
        Ok(self.objects()?.contains_key(oid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn concurrent_writers_converge_on_one_object() {
        let database = MemoryDatabase::new();

        let oids = std::thread::scope(|scope| {
            let handles = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        database
                            .store(ObjectType::Blob, Bytes::from_static(b"same payload"))
                            .unwrap()
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Vec<_>>()
        });

        assert!(oids.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(database.len(), 1);
    }

    #[test]
    fn load_round_trips_kind_and_payload() {
        let database = MemoryDatabase::new();
        let oid = database
            .store(ObjectType::Commit, Bytes::from_static(b"payload"))
            .unwrap();

        let raw = database.load(&oid).unwrap();
        assert_eq!(raw.kind, ObjectType::Commit);
        assert_eq!(&raw.payload[..], b"payload");
    }
}
