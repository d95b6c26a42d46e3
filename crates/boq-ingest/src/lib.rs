//! BOQ ingestion: turns heterogeneous raw rows into validated canonical
//! positions.
//!
//! Two stages live here. The normalizer resolves header aliases, parses
//! EU-locale numbers, filters malformed codes and classifies section and
//! resource rows. The schema validator re-canonicalizes surviving
//! positions, removes near-identical duplicates and attaches section
//! metadata from the code-prefix index. Both stages recover from row
//! problems locally; nothing here ever fails the run.

pub mod headers;
pub mod normalize;
pub mod numbers;
pub mod schema;

pub use headers::{Field, HeaderMap, resolve_headers};
pub use normalize::{NormalizeStats, normalize_rows};
pub use numbers::{NumberToken, format_eu, parse_eu};
pub use schema::{SchemaStats, validate_schema};
