//! Domain value objects and pure rendering logic: load modes, input file
//! and table specifications, control file assembly, and the TNS connection
//! string. Nothing in here performs I/O beyond what the caller passes in.

pub mod control_file;
pub mod errors;
pub mod input_file;
pub mod mode;
pub mod table;
pub mod tns;

pub use control_file::ControlFileBuilder;
pub use errors::{LoaderError, Result};
pub use input_file::{InputFileSpec, INLINE_DATA_MARKER};
pub use mode::LoadMode;
pub use table::TableLoadSpec;
