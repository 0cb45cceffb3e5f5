//! Summary: canopy - in-memory ordered associative containers.
//! Copyright (c) YOAB. All rights reserved.
//!
//! Two balanced-tree engines over a totally-ordered key type: a classical
//! B-Tree (records at every level) and a B+Tree (records at the leaves,
//! chained for linear in-order walks). Both expose the same associative
//! contract, and the dictionary facade adapts either engine to a key/value
//! surface consumed by the bundled virtual filesystem shell.

pub mod bplustree;
pub mod btree;
pub mod cursor;
pub mod dict;
pub mod error;
pub mod path;
mod pool;
pub mod record;
pub mod seq;
pub mod vfs;

// Re-export public API at crate root for convenience.
pub use bplustree::BPlusTree;
pub use btree::BTree;
pub use cursor::CursorState;
pub use dict::{Associative, BPlusDictionary, BTreeDictionary, Dictionary};
pub use error::{Error, Result};
pub use path::VfsPath;
pub use record::{Key, Record};
pub use seq::Sequence;
pub use vfs::{Opened, Vfs};
