//! Filegate Database Library
//!
//! Record store trait and its PostgreSQL and in-memory implementations.

pub mod db;

pub use db::{
    create_metadata_store, MemoryMetadataStore, MetadataStore, PostgresMetadataStore,
};
