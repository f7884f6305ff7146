pub mod core;
pub mod binary;
pub mod schema;
pub mod codec;
pub mod model;
pub mod metadata;
pub mod indexer;
pub mod stats;
pub mod storage;

pub use crate::core::config::BuildOptions;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::indexer::pipeline::build_database;
pub use crate::indexer::{BuildReport, ScanFailure};
pub use crate::metadata::adapter::{GenreMap, PathRewrite};
pub use crate::metadata::{MetadataReader, RawMetadata};
pub use crate::model::database::Database;
pub use crate::model::entry::{Entry, StringId};
pub use crate::schema::TagId;
pub use crate::stats::{migrate_stats, MigrationReport};
pub use crate::storage::parser::parse_database;
pub use crate::storage::writer::write_database;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                          TAGCACHE STRUCT ARCHITECTURE                        │
└──────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────────── MODEL ────────────────────────────────────┐
│                                                                              │
│  ┌──────────────────────────┐   ┌──────────────────────────────────────┐    │
│  │ struct Database          │   │ struct Entry                         │    │
│  │ • entries: Vec<Entry>    │   │ • strings: [Option<StringId>; 9]     │    │
│  │ • tables: [StringTable;9]│   │ • numerics: [u32; 11]                │    │
│  │ • serial: u32            │   │ • flags: u32                         │    │
│  └──────────────────────────┘   └──────────────────────────────────────┘    │
│                                                                              │
│  ┌──────────────────────────┐   ┌──────────────────────────────────────┐    │
│  │ struct StringTable       │   │ enum TagId (canonical order)         │    │
│  │ • strings: Vec<Vec<u8>>  │   │ • 0..=8  string tags → tag files     │    │
│  │ • lookup: HashMap        │   │ • 9..=19 numeric tags → embedded     │    │
│  └──────────────────────────┘   └──────────────────────────────────────┘    │
└──────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────── CODEC ─────────────────────────────────────┐
│                                                                              │
│  ┌──────────────────┐  ┌─────────────────────┐  ┌───────────────────────┐   │
│  │ struct FileHeader│  │ tag_file::encode/   │  │ master::encode/decode │   │
│  │ • magic, version │  │ decode              │  │ • RawEntry (refs as   │   │
│  │ • entry_count    │  │ • TagStringRecord   │  │   file offsets)       │   │
│  │ • data_size      │  │ • NUL-padded, align4│  │ • 84-byte entries     │   │
│  │ • serial         │  └─────────────────────┘  └───────────────────────┘   │
│  └──────────────────┘                                                       │
│                                                                              │
│  binary::{Cursor, Emitter, ByteOrder} — bounds-checked reads, offset        │
│  tracking and back-patching, byte order as an explicit parameter            │
└──────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── PIPELINE ────────────────────────────────────┐
│                                                                              │
│  walker ──paths──> bounded queue ──> worker pool ──records──> collector     │
│  (sorted walk)                       (MetadataReader)    (slots by seq no)  │
│                                           │                    │            │
│                                       error channel      sequential intern  │
│                                           │                    │            │
│                                      BuildReport          Database          │
└──────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── RELATIONSHIPS ────────────────────────────────┐
│                                                                              │
│  build_database ──uses──> Indexer ──produces──> Database + BuildReport      │
│  write_database ──lays out──> tag files ──patches──> master index           │
│  parse_database ──decodes──> tag files + master ──joins──> Database         │
│  migrate_stats  ──matches by filename──> copies runtime counters            │
│                                                                              │
└──────────────────────────────────────────────────────────────────────────────┘
*/
