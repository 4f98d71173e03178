//! # SQL*Loader Wrapper
//!
//! Generates Oracle SQL*Loader control files from a declarative load
//! description and runs the `sqlldr` binary as an external process,
//! reporting back its exit status, output, and log file.
//!
//! The crate follows the **Hexagonal Architecture** (Ports and Adapters):
//! disk storage, process execution, and CSV header sniffing are traits the
//! orchestrator calls through, so the control-file generation core stays
//! independent of infrastructure and fully testable with mocks.
//!
//! ```no_run
//! use sqlloader::{AppConfig, InputFileSpec, LoadMode, SqlLoader, TableLoadSpec};
//!
//! # fn main() -> sqlloader::Result<()> {
//! let mut loader = SqlLoader::from_config(AppConfig::default())
//!     .options(vec!["skip=1".into()])
//!     .in_file(InputFileSpec::new("/data/users.dat"))
//!     .mode(LoadMode::Append)
//!     .into_table(
//!         TableLoadSpec::new("users")
//!             .columns(vec!["id".into(), "name".into(), "email".into()])
//!             .terminated_by(",")
//!             .enclosed_by("\"")
//!             .trailing_nullcols(),
//!     );
//!
//! loader.execute()?;
//! assert!(loader.successful());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{LoadJob, SqlLoader};
pub use config::{AppConfig, ConnectionConfig};
pub use domain::{
    ControlFileBuilder, InputFileSpec, LoadMode, LoaderError, Result, TableLoadSpec,
};
pub use ports::{CsvPort, ProcessOutput, ProcessPort, StoragePort};
