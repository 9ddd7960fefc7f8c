// lib/src/storage_engine/collection.rs
//! List-backed repository for one entity type.

use std::slice;

use models::identifiers::{format_id, next_sequence};
use models::{ClinicError, ClinicResult, Entity};

#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection { items: Vec::new() }
    }
}

impl<T: Entity> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from loaded rows, rejecting duplicate ids.
    pub fn from_vec(items: Vec<T>) -> ClinicResult<Self> {
        let mut collection = Self::new();
        for item in items {
            collection.add(item)?;
        }
        Ok(collection)
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Like `get`, but a missing id is a `NotFound` error.
    pub fn find(&self, id: &str) -> ClinicResult<&T> {
        self.get(id).ok_or_else(|| ClinicError::not_found(T::KIND, id))
    }

    pub fn get_mut(&mut self, id: &str) -> ClinicResult<&mut T> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| ClinicError::not_found(T::KIND, id))
    }

    /// Resolves an id to its position so that several rows can be checked
    /// before any of them is written through `at_mut`.
    pub fn position(&self, id: &str) -> ClinicResult<usize> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| ClinicError::not_found(T::KIND, id))
    }

    /// Panics if `index` did not come from `position` on this collection.
    pub fn at(&self, index: usize) -> &T {
        &self.items[index]
    }

    /// Panics if `index` did not come from `position` on this collection.
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }

    pub fn add(&mut self, item: T) -> ClinicResult<()> {
        if self.contains(item.id()) {
            return Err(ClinicError::AlreadyExists {
                entity: T::KIND,
                id: item.id().to_string(),
            });
        }
        self.items.push(item);
        Ok(())
    }

    pub fn update(&mut self, item: T) -> ClinicResult<()> {
        let index = self.position(item.id())?;
        self.items[index] = item;
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> ClinicResult<T> {
        let index = self.position(id)?;
        Ok(self.items.remove(index))
    }

    pub fn filter<P>(&self, mut predicate: P) -> Vec<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).collect()
    }

    /// First unused sequence number for ids generated under `prefix`.
    pub fn next_sequence(&self, prefix: &str) -> ClinicResult<u32> {
        Ok(next_sequence(prefix, self.items.iter().map(|item| item.id()))?)
    }

    pub fn next_id(&self, prefix: &str) -> ClinicResult<String> {
        Ok(format_id(prefix, self.next_sequence(prefix)?))
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
