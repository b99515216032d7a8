//! Catalog core: posting lists, inverted index, directory tree, file table
//! and the catalog that keeps them consistent.

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod metadata;
pub mod posting;
pub mod table;
pub mod tree;
pub mod validation;


pub use catalog::Catalog;
