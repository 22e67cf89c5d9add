//! Storage domain - the record store contract

mod entity;
mod repository;

pub use entity::Record;
pub use repository::RecordStore;

#[cfg(test)]
pub use entity::fixtures;
#[cfg(test)]
pub use repository::mock::MockRecordStore;
