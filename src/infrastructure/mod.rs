//! Concrete adapters behind the ports: local disk storage, shell process
//! execution, and CSV header reading.

pub mod csv_header;
pub mod local_disk;
pub mod shell;

pub use csv_header::CsvHeaderAdapter;
pub use local_disk::LocalDiskAdapter;
pub use shell::ShellAdapter;
