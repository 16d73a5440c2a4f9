/// Data layer: core types, loading, registry, and wire encoding.
///
/// Architecture:
/// ```text
///   data dir (recursive)
///        │  *.txt
///        ▼
///   ┌──────────┐
///   │  loader   │  parse tab table → Dataset   (fail-fast)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ registry  │  file name → Dataset, read-only after startup
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  encode   │  &[f64] → little-endian bytes
///   └──────────┘
/// ```

pub mod encode;
pub mod loader;
pub mod model;
pub mod registry;
