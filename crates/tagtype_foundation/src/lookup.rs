//! Ordered, id-indexed collections.
//!
//! A [`LookupTable`] is the default container for has-many relationships:
//! segments of a path, members of a group, panes of a layout. Iteration order
//! is the business order; the id index only speeds up point lookup.

use std::fmt;
use std::sync::Arc;

use crate::{Error, ErrorKind, Result};

/// Something that can be stored in a [`LookupTable`].
pub trait Keyed {
    /// Reads the element's id from the named field.
    ///
    /// Returns `None` if the element has no usable id there.
    fn key(&self, id_field: &str) -> Option<Arc<str>>;
}

/// Insertion-ordered sequence with id-keyed point lookup.
///
/// Ids are unique at all times and the id field is fixed per table. Every
/// operation returns a new table sharing structure with the old one.
#[derive(Clone)]
pub struct LookupTable<T: Clone> {
    id_field: Arc<str>,
    order: im::Vector<Arc<str>>,
    items: im::HashMap<Arc<str>, T>,
}

impl<T: Clone> LookupTable<T> {
    /// Creates an empty table keyed by `id_field`.
    #[must_use]
    pub fn new(id_field: impl Into<Arc<str>>) -> Self {
        Self {
            id_field: id_field.into(),
            order: im::Vector::new(),
            items: im::HashMap::new(),
        }
    }

    /// The name of the field elements are keyed by.
    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Looks up an element by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    /// Returns true if an element with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// The element at `index` in table order.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&T> {
        self.order.get(index).and_then(|id| self.items.get(id))
    }

    /// The first element in table order.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.at(0)
    }

    /// Elements in table order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// `(id, element)` pairs in table order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &T)> {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id).map(|item| (&**id, item)))
    }

    /// Ids in table order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|id| &**id)
    }

    /// Position of an id in table order.
    #[must_use]
    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|x| &**x == id)
    }

    /// Position of the first element satisfying `predicate`.
    pub fn find_index(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.iter().position(|item| predicate(item))
    }

    /// Removes the element with this id. Absent ids are a no-op.
    #[must_use]
    pub fn remove_by_id(&self, id: &str) -> Self {
        let Some(index) = self.index_of_id(id) else {
            return self.clone();
        };
        let mut new = self.clone();
        new.order.remove(index);
        new.items.remove(id);
        new
    }

    /// Moves the element at `from` so it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if either index is past the end.
    pub fn move_index(&self, from: usize, to: usize) -> Result<Self> {
        let length = self.len();
        for index in [from, to] {
            if index >= length {
                return Err(Error::new(ErrorKind::IndexOutOfBounds { index, length }));
            }
        }
        let mut new = self.clone();
        let id = new.order.remove(from);
        new.order.insert(to, id);
        Ok(new)
    }

    /// Rebuilds the table as exactly this id sequence, dropping every other
    /// element.
    ///
    /// # Errors
    ///
    /// Returns `UnknownId` for an id the table does not hold, or
    /// `DuplicateId` if an id is listed twice.
    pub fn reorder_and_filter_to<I, S>(&self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut order = im::Vector::new();
        let mut items = im::HashMap::new();
        for id in ids {
            let id = id.as_ref();
            let Some(item) = self.items.get(id) else {
                return Err(Error::new(ErrorKind::UnknownId(id.to_string())));
            };
            let key: Arc<str> = id.into();
            if items.insert(key.clone(), item.clone()).is_some() {
                return Err(Error::new(ErrorKind::DuplicateId(id.to_string())));
            }
            order.push_back(key);
        }
        Ok(Self {
            id_field: self.id_field.clone(),
            order,
            items,
        })
    }
}

impl<T: Clone + Keyed> LookupTable<T> {
    /// Builds a table from elements in order.
    ///
    /// # Errors
    ///
    /// Returns `MissingId` if an element has no id, or `DuplicateId` if two
    /// elements share one.
    pub fn from_items<I>(id_field: impl Into<Arc<str>>, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut table = Self::new(id_field);
        for item in items {
            let id = table.key_of(&item)?;
            if table.items.insert(id.clone(), item).is_some() {
                return Err(Error::new(ErrorKind::DuplicateId(id.to_string())));
            }
            table.order.push_back(id);
        }
        Ok(table)
    }

    fn key_of(&self, item: &T) -> Result<Arc<str>> {
        item.key(&self.id_field).ok_or_else(|| {
            Error::new(ErrorKind::MissingId {
                field: self.id_field.to_string(),
            })
        })
    }

    /// Replaces the element with the same id in place, or appends it.
    ///
    /// # Errors
    ///
    /// Returns `MissingId` if the element has no id.
    pub fn upsert_by_id(&self, item: T) -> Result<Self> {
        let id = self.key_of(&item)?;
        let mut new = self.clone();
        if new.items.insert(id.clone(), item).is_none() {
            new.order.push_back(id);
        }
        Ok(new)
    }

    /// Transforms every element, keeping order and ids.
    ///
    /// # Errors
    ///
    /// Returns `IdChanged` if the transform gives an element a different id,
    /// or `MissingId` if it removes the id.
    pub fn map_in_place_order(&self, mut f: impl FnMut(&T) -> T) -> Result<Self> {
        let mut items = im::HashMap::new();
        for id in &self.order {
            let Some(old) = self.items.get(id) else {
                continue;
            };
            let new = f(old);
            let new_id = self.key_of(&new)?;
            if new_id != *id {
                return Err(Error::new(ErrorKind::IdChanged {
                    from: id.to_string(),
                    to: new_id.to_string(),
                }));
            }
            items.insert(id.clone(), new);
        }
        Ok(Self {
            id_field: self.id_field.clone(),
            order: self.order.clone(),
            items,
        })
    }
}

impl<T: Clone + PartialEq> LookupTable<T> {
    /// Position of an element equal to `item`.
    #[must_use]
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|x| x == item)
    }
}

impl<T: Clone + PartialEq> PartialEq for LookupTable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id_field == other.id_field
            && self.order == other.order
            && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for LookupTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

impl<T: Clone + fmt::Display> fmt::Display for LookupTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LookupTable[")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{item}")?;
        }
        write!(f, "]")
    }
}
