//! In-memory book store.
//!
//! Books live in a `Vec` guarded by a `RwLock`, so insertion order is the list
//! order. Identifiers come from a counter that only moves forward: deleting the
//! newest book never makes its identifier available again.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{seed_books, Book, BookRepository, NewBook, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    books: Vec<Book>,
    /// Highest numeric identifier handed out or seeded so far
    last_id: u64,
}

/// In-memory implementation of [`BookRepository`].
///
/// Lifetime of the data equals the lifetime of the value; nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    inner: RwLock<Inner>,
}

impl MemoryBookStore {
    /// Creates an empty store. The first inserted book gets identifier "1".
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given books.
    ///
    /// The identifier counter continues after the largest numeric identifier
    /// among them; non-numeric identifiers are ignored by the counter.
    pub fn with_books(books: Vec<Book>) -> Self {
        let last_id = books
            .iter()
            .filter_map(|b| b.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            inner: RwLock::new(Inner { books, last_id }),
        }
    }

    /// Creates a store with the two seed books.
    pub fn seeded() -> Self {
        Self::with_books(seed_books())
    }

    /// Creates a new store wrapped in `Arc`.
    pub fn new_shared(seed: bool) -> Arc<Self> {
        Arc::new(if seed { Self::seeded() } else { Self::new() })
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl BookRepository for MemoryBookStore {
    fn list(&self) -> StoreResult<Vec<Book>> {
        Ok(self.read()?.books.clone())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Book>> {
        Ok(self.read()?.books.iter().find(|b| b.id == id).cloned())
    }

    fn insert(&self, book: NewBook) -> StoreResult<Book> {
        let mut inner = self.write()?;
        let next = inner.last_id.checked_add(1).ok_or(StoreError::IdExhausted)?;
        inner.last_id = next;

        let book = book.into_book(next.to_string());
        inner.books.push(book.clone());
        drop(inner);
        Ok(book)
    }

    fn replace(&self, book: Book) -> StoreResult<bool> {
        let mut inner = self.write()?;
        match inner.books.iter_mut().find(|b| b.id == book.id) {
            Some(slot) => {
                *slot = book;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, id: &str) -> StoreResult<Option<Book>> {
        let mut inner = self.write()?;
        let removed = inner
            .books
            .iter()
            .position(|b| b.id == id)
            .map(|index| inner.books.remove(index));
        Ok(removed)
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.books.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Someone".to_string(),
            year: None,
            genre: None,
        }
    }

    #[test]
    fn test_seeded_store_keeps_seed_order() {
        let store = MemoryBookStore::seeded();
        let ids: Vec<_> = store.list().unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_insert_continues_after_seed_ids() {
        let store = MemoryBookStore::seeded();
        let book = store.insert(new_book("Dune")).unwrap();
        assert_eq!(book.id, "3");
        assert_eq!(store.len().unwrap(), 3);
        assert_eq!(store.list().unwrap().last().unwrap().title, "Dune");
    }

    #[test]
    fn test_insert_after_delete_does_not_reuse_id() {
        let store = MemoryBookStore::seeded();
        store.remove("2").unwrap();
        let book = store.insert(new_book("Emma")).unwrap();
        assert_eq!(book.id, "3");

        // Deleting the newest book must not free its id either
        store.remove("3").unwrap();
        let book = store.insert(new_book("Ulysses")).unwrap();
        assert_eq!(book.id, "4");
    }

    #[test]
    fn test_empty_store_starts_at_one() {
        let store = MemoryBookStore::new();
        assert!(store.is_empty().unwrap());
        assert_eq!(store.insert(new_book("First")).unwrap().id, "1");
    }

    #[test]
    fn test_counter_reads_zero_padded_ids() {
        let mut books = seed_books();
        books[1].id = "03".to_string();
        let store = MemoryBookStore::with_books(books);
        // "03" parses to 3, so the counter starts after it
        assert_eq!(store.insert(new_book("Next")).unwrap().id, "4");
    }

    #[test]
    fn test_counter_overflow() {
        let mut books = seed_books();
        books[0].id = u64::MAX.to_string();
        let store = MemoryBookStore::with_books(books);
        assert_eq!(
            store.insert(new_book("Overflow")).unwrap_err(),
            StoreError::IdExhausted
        );
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_replace_keeps_position() {
        let store = MemoryBookStore::seeded();
        let mut book = store.get("1").unwrap().unwrap();
        book.title = "Renamed".to_string();
        assert!(store.replace(book).unwrap());

        let books = store.list().unwrap();
        assert_eq!(books[0].id, "1");
        assert_eq!(books[0].title, "Renamed");
        assert_eq!(books.len(), 2);
    }

    #[test]
    fn test_replace_unknown_id() {
        let store = MemoryBookStore::seeded();
        let mut book = store.get("1").unwrap().unwrap();
        book.id = "999".to_string();
        assert!(!store.replace(book).unwrap());
        assert_eq!(store.get("1").unwrap().unwrap().title, "The Great Gatsby");
    }

    #[test]
    fn test_remove() {
        let store = MemoryBookStore::seeded();
        let removed = store.remove("1").unwrap().unwrap();
        assert_eq!(removed.title, "The Great Gatsby");
        assert!(store.get("1").unwrap().is_none());
        assert!(store.remove("1").unwrap().is_none());
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_get_is_exact_match() {
        let store = MemoryBookStore::seeded();
        assert!(store.get("01").unwrap().is_none());
        assert!(store.get(" 1").unwrap().is_none());
        assert!(store.get("1").unwrap().is_some());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let store = Arc::new(MemoryBookStore::seeded());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(store.list().unwrap_err(), StoreError::LockPoisoned);
        assert_eq!(
            store.insert(new_book("Never")).unwrap_err(),
            StoreError::LockPoisoned
        );
    }
}
