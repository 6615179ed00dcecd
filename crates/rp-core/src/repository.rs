//! # Entity Repository
//!
//! One generic CRUD contract over a whole-collection store. Every operation
//! seeds first, then reads the full collection; mutations write it back in
//! full. There is no locking: two unawaited mutations on the same collection
//! can lose an update.

use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::entity::{Entity, Stamp};
use crate::error::Result;
use crate::models::EntityId;
use crate::seed::Seeder;
use crate::storage::{decode, encode, overlay, Storage};
use crate::traits::{Clock, SessionProvider};

pub struct Repository<E: Entity> {
    storage: Storage,
    seeder: Seeder,
    clock: Arc<dyn Clock>,
    session: Arc<dyn SessionProvider>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            seeder: self.seeder.clone(),
            clock: Arc::clone(&self.clock),
            session: Arc::clone(&self.session),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(storage: Storage, clock: Arc<dyn Clock>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            seeder: Seeder::new(storage.clone()),
            storage,
            clock,
            session,
            _entity: PhantomData,
        }
    }

    /// Storage order, no sorting. A failed read degrades to an empty list.
    pub async fn list(&self) -> Vec<E> {
        match self.try_list().await {
            Ok(records) => records,
            Err(err) => {
                warn!(collection = %E::COLLECTION, error = %err, "list degraded to empty");
                Vec::new()
            }
        }
    }

    /// Like [`list`](Self::list) but reports storage and parse failures.
    pub async fn try_list(&self) -> Result<Vec<E>> {
        self.seeder.ensure_seeded().await;
        self.storage.read(E::COLLECTION).await
    }

    pub async fn get_by_id(&self, id: &str) -> Option<E> {
        self.list().await.into_iter().find(|record| record.id() == id)
    }

    /// Stored values paired with their typed records, after seeding.
    async fn load(&self) -> Result<(Vec<Value>, Vec<E>)> {
        self.seeder.ensure_seeded().await;
        let raw = self.storage.read_raw(E::COLLECTION).await?;
        let records = raw
            .iter()
            .map(|value| decode(E::COLLECTION, value))
            .collect::<Result<Vec<E>>>()?;
        Ok((raw, records))
    }

    #[instrument(skip_all, fields(collection = %E::COLLECTION))]
    pub async fn create(&self, draft: E::Draft) -> Result<E> {
        let (mut raw, records) = self.load().await?;
        let author = if E::AUTHORED {
            self.session.current_user().await
        } else {
            None
        };
        let stamp = Stamp::new(self.clock.now(), author);
        let record = E::from_draft(fresh_id(&records), draft, &stamp);
        raw.push(encode(E::COLLECTION, &record)?);
        self.storage.write_raw(E::COLLECTION, &raw).await?;
        Ok(record)
    }

    /// `None` when no record has `id`; nothing is written in that case.
    /// Stored fields the record type does not know are carried over.
    #[instrument(skip(self, patch), fields(collection = %E::COLLECTION))]
    pub async fn update(&self, id: &str, patch: E::Patch) -> Result<Option<E>> {
        let (mut raw, mut records) = self.load().await?;
        let Some(index) = records.iter().position(|record| record.id() == id) else {
            return Ok(None);
        };
        let before = encode(E::COLLECTION, &records[index])?;
        let record = &mut records[index];
        record.apply(patch, &Stamp::new(self.clock.now(), None));
        let after = encode(E::COLLECTION, &*record)?;
        raw[index] = overlay(std::mem::take(&mut raw[index]), &before, after);
        self.storage.write_raw(E::COLLECTION, &raw).await?;
        Ok(Some(records.swap_remove(index)))
    }

    /// Hard removal. `false` (and no write) when no record has `id`.
    #[instrument(skip(self), fields(collection = %E::COLLECTION))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let (raw, records) = self.load().await?;
        if !records.iter().any(|record| record.id() == id) {
            return Ok(false);
        }
        let kept: Vec<Value> = raw
            .into_iter()
            .zip(&records)
            .filter(|(_, record)| record.id() != id)
            .map(|(value, _)| value)
            .collect();
        self.storage.write_raw(E::COLLECTION, &kept).await?;
        Ok(true)
    }
}

/// Time-ordered random id (UUID v7) not already used in `records`.
fn fresh_id<E: Entity>(records: &[E]) -> EntityId {
    let taken: HashSet<&str> = records.iter().map(Entity::id).collect();
    loop {
        let id = Uuid::now_v7().simple().to_string();
        if !taken.contains(id.as_str()) {
            return id;
        }
    }
}
