//! Ports are the contracts between the load orchestrator and the outside
//! world: disk storage, process execution, and CSV header sniffing. Any
//! struct implementing a port trait (including a test mock) can be wired
//! into the orchestrator.

pub mod csv_port;
pub mod process_port;
pub mod storage_port;

pub use csv_port::CsvPort;
pub use process_port::{ProcessOutput, ProcessPort};
pub use storage_port::StoragePort;
