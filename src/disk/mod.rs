pub mod block_device;
pub mod command;
pub mod error;
pub mod file_disk;
pub mod init;
pub mod jbod;
pub mod mem_disk;
pub mod types;

pub use block_device::BlockDevice;
pub use command::Command;
pub use error::JbodError;
pub use file_disk::{FileDisk, ImageHeader};
pub use jbod::{Jbod, JbodDevice};
pub use mem_disk::MemDisk;
pub use types::*;
