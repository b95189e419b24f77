// madden-export-core - Classification and persistence of companion app exports
//
// Pipeline per request:
// 1. classify the URL path into PathMetadata
// 2. parse the body as JSON (or keep it raw)
// 3. infer an export label, build a file name, write it under the data directory
//
// No HTTP, configuration or subscriber setup lives here.

pub mod error;
pub mod naming;
pub mod path;
pub mod payload;
pub mod persist;
pub mod storage;

pub use error::{PersistError, Result};
pub use path::{classify, PathMetadata};
pub use payload::Payload;
pub use persist::Persister;
