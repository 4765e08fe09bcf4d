//! The catalog store: sole owner of the in-memory record collection.
//!
//! Records live in an insertion-ordered arena keyed by [`RecordId`]. Lookups
//! hand out ids rather than references, and every mutation takes an id, so a
//! removed record can never be touched through a stale handle.
//!
//! All mutating methods take `&mut self`: at most one mutation is in flight
//! at a time. A shared wrapper must serialize `upsert`, `adjust_quantity`,
//! `set_quantity`, `remove` and `deduplicate_and_merge` behind one
//! collection-wide exclusive lock, since the negative-stock check and the
//! write it guards form a single step.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::CatalogError;
use crate::key::normalize;
use crate::types::{Field, Record, RecordId};

/// Outcome of [`CatalogStore::upsert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
    pub id: RecordId,
    /// `true` if a new record was appended, `false` if existing stock grew.
    pub created: bool,
    /// Quantity of the record after the call.
    pub quantity: u64,
}

/// In-memory collection of one record kind.
#[derive(Debug, Clone)]
pub struct CatalogStore<R> {
    records: IndexMap<RecordId, R>,
}

impl<R: Record> Default for CatalogStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> CatalogStore<R> {
    pub fn new() -> Self {
        Self {
            records: IndexMap::new(),
        }
    }

    /// Build a store from loaded records, keeping their order.
    ///
    /// A record whose id collides with an earlier one is given a fresh id;
    /// duplicate keys are left in place for [`deduplicate_and_merge`](Self::deduplicate_and_merge).
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        let mut store = Self::new();
        for mut record in records {
            if store.records.contains_key(&record.id()) {
                let fresh = RecordId::new();
                log::debug!(
                    "Reassigning duplicate id {} on '{}' to {}",
                    record.id(),
                    record.name(),
                    fresh,
                );
                record.set_id(fresh);
            }
            store.records.insert(record.id(), record);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.get(&id)
    }

    /// Records with their ids, in collection order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &R)> {
        self.records.iter().map(|(id, r)| (*id, r))
    }

    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.records.values()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.records
            .values()
            .fold(0u64, |acc, r| acc.saturating_add(r.quantity()))
    }

    pub fn into_records(self) -> Vec<R> {
        self.records.into_values().collect()
    }

    // ── Lookup ──────────────────────────────────────────────────────────────

    /// First record, in collection order, whose normalized name equals
    /// `name` and, when given, whose normalized publisher equals `publisher`.
    ///
    /// A publisher key never matches a kind without a publisher field.
    pub fn find_exact(&self, name: &str, publisher: Option<&str>) -> Option<RecordId> {
        let name = normalize(name);
        let publisher = publisher.map(normalize);
        self.records
            .iter()
            .find(|(_, r)| {
                normalize(r.name()) == name
                    && publisher.as_ref().is_none_or(|p| {
                        r.field(Field::Publisher)
                            .is_some_and(|rp| normalize(rp) == *p)
                    })
            })
            .map(|(id, _)| *id)
    }

    /// Records whose `field` contains `term`, case-insensitively.
    ///
    /// The term is trimmed; an empty term matches every record that has the
    /// field. Lazy and read-only.
    pub fn filter<'a>(
        &'a self,
        field: Field,
        term: &str,
    ) -> impl Iterator<Item = (RecordId, &'a R)> + use<'a, R> {
        let term = normalize(term);
        self.records.iter().filter_map(move |(id, r)| {
            r.field(field)
                .filter(|value| value.to_lowercase().contains(&term))
                .map(|_| (*id, r))
        })
    }

    // ── Mutation ────────────────────────────────────────────────────────────

    /// Insert a new record, or restock the existing one with the same
    /// identity key.
    ///
    /// On a hit only the quantity changes; descriptive fields of the stored
    /// record are kept. On a miss the draft is appended under a fresh id.
    pub fn upsert(&mut self, draft: R) -> Result<Upserted, CatalogError> {
        draft.validate()?;
        let key = draft.identity_key();

        if let Some(existing) = self.records.values_mut().find(|r| r.identity_key() == key) {
            let quantity = existing
                .quantity()
                .checked_add(draft.quantity())
                .ok_or_else(|| CatalogError::QuantityOverflow(existing.name().to_string()))?;
            *existing.quantity_mut() = quantity;
            log::debug!(
                "Restocked '{}' by {} to {}",
                existing.name(),
                draft.quantity(),
                quantity,
            );
            return Ok(Upserted {
                id: existing.id(),
                created: false,
                quantity,
            });
        }

        let mut record = draft;
        let id = RecordId::new();
        record.set_id(id);
        let quantity = record.quantity();
        log::debug!("Registered {} '{}' as {}", R::KIND.noun, record.name(), id);
        self.records.insert(id, record);
        Ok(Upserted {
            id,
            created: true,
            quantity,
        })
    }

    /// Add a signed `delta` to a record's quantity.
    ///
    /// Fails with [`CatalogError::InsufficientStock`] if the result would be
    /// negative; the record is unchanged on any error. Returns the new quantity.
    pub fn adjust_quantity(&mut self, id: RecordId, delta: i64) -> Result<u64, CatalogError> {
        let record = self.get_mut(id)?;
        let available = record.quantity();
        let next = if delta >= 0 {
            available
                .checked_add(delta.unsigned_abs())
                .ok_or_else(|| CatalogError::QuantityOverflow(record.name().to_string()))?
        } else {
            available
                .checked_sub(delta.unsigned_abs())
                .ok_or_else(|| CatalogError::InsufficientStock {
                    name: record.name().to_string(),
                    available,
                    change: delta,
                })?
        };
        *record.quantity_mut() = next;
        Ok(next)
    }

    /// Set a record's quantity to exactly `quantity`, which must be `>= 0`.
    pub fn set_quantity(&mut self, id: RecordId, quantity: i64) -> Result<u64, CatalogError> {
        let record = self.get_mut(id)?;
        let Ok(next) = u64::try_from(quantity) else {
            let available = record.quantity();
            return Err(CatalogError::InsufficientStock {
                name: record.name().to_string(),
                available,
                change: quantity.saturating_sub_unsigned(available),
            });
        };
        *record.quantity_mut() = next;
        Ok(next)
    }

    /// Remove a record by id and hand it back.
    pub fn remove(&mut self, id: RecordId) -> Result<R, CatalogError> {
        self.records
            .shift_remove(&id)
            .ok_or_else(|| CatalogError::not_found(format!("{} {}", R::KIND.noun, id)))
    }

    /// Fold records sharing an identity key into the first one seen.
    ///
    /// Quantities are summed into the first record; its id and descriptive
    /// fields win, later duplicates are dropped. First-seen order is kept.
    /// A duplicate whose quantity would overflow the first record's is left
    /// in place as a separate record, so no units are ever lost.
    /// Returns how many records were folded away. Idempotent: a second pass
    /// right after the first returns 0.
    pub fn deduplicate_and_merge(&mut self) -> usize {
        let mut kept: IndexMap<RecordId, R> = IndexMap::with_capacity(self.records.len());
        let mut first_by_key: HashMap<String, RecordId> = HashMap::new();
        let mut folded = 0;

        for (id, record) in self.records.drain(..) {
            let first = first_by_key
                .get(&record.identity_key())
                .and_then(|first| kept.get_mut(first));
            let Some(first) = first else {
                first_by_key.insert(record.identity_key(), id);
                kept.insert(id, record);
                continue;
            };

            match first.quantity().checked_add(record.quantity()) {
                Some(total) => {
                    *first.quantity_mut() = total;
                    folded += 1;
                    log::debug!(
                        "Merged duplicate {} '{}' ({} units) into {}",
                        R::KIND.noun,
                        record.name(),
                        record.quantity(),
                        first.id(),
                    );
                }
                None => {
                    log::warn!(
                        "Not merging duplicate {} '{}': {} + {} units would overflow",
                        R::KIND.noun,
                        record.name(),
                        first.quantity(),
                        record.quantity(),
                    );
                    kept.insert(id, record);
                }
            }
        }

        self.records = kept;
        folded
    }

    fn get_mut(&mut self, id: RecordId) -> Result<&mut R, CatalogError> {
        self.records
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found(format!("{} {}", R::KIND.noun, id)))
    }
}
