/// Data layer: loading, typing and summarising uploads.
///
/// Architecture:
/// ```text
///  UploadedFile (.csv / workbook)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bytes → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  infer    │  RawTable → Dataset (typed columns)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌───────────┐
///   │  stats    │   │ histogram │  describe / missing, bins + density
///   └──────────┘   └───────────┘
/// ```

pub mod histogram;
pub mod infer;
pub mod loader;
pub mod model;
pub mod stats;
