use std::collections::HashMap;
use std::sync::RwLock;

pub mod attendance;
pub mod class;
pub mod event;
pub mod user;

use attendance::Attendance;
use class::Class;
use event::Event;
use user::User;

/// A single entity table: rows keyed by id, plus the id counter.
///
/// Ids start at 1 and only ever increase, so within a process lifetime every
/// created row has a unique, monotonically increasing id even after deletes.
#[derive(Debug)]
pub(crate) struct Table<T> {
    rows: HashMap<i64, T>,
    next_id: i64,
}

impl<T> Table<T> {
    fn new() -> Self {
        Table {
            rows: HashMap::new(),
            next_id: 1,
        }
    }

    pub(crate) fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: i64) -> Option<T> {
        self.rows.remove(&id)
    }

    pub(crate) fn values(&self) -> std::collections::hash_map::Values<'_, i64, T> {
        self.rows.values()
    }
}

impl<T: Clone> Table<T> {
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;

        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }
}

/// The in-memory repository standing in for a database.
///
/// An instance is built per process (or per test) and handed to Rocket as
/// managed state; nothing here is a global. There are no transactions and no
/// referential integrity: deletes never cascade, and foreign keys are allowed
/// to dangle.
#[derive(Debug)]
pub struct Store {
    pub(crate) users: RwLock<Table<User>>,
    pub(crate) classes: RwLock<Table<Class>>,
    pub(crate) events: RwLock<Table<Event>>,
    pub(crate) attendance: RwLock<Table<Attendance>>,
}

impl Store {
    pub fn new() -> Store {
        Store {
            users: RwLock::new(Table::new()),
            classes: RwLock::new(Table::new()),
            events: RwLock::new(Table::new()),
            attendance: RwLock::new(Table::new()),
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}
