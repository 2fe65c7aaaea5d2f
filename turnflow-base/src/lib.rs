//! Base components for [TurnFlow](crate)
//!
//! Provides ID types and the ordered, name-addressable [`ObjectStore`] used to register flow nodes.

mod errors;
pub use errors::IdError;

pub mod id;

mod object_store;
pub use object_store::{ ObjectStore, ObjectStoreContent };

#[cfg(test)]
mod test;
