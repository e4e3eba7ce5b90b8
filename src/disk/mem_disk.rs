use std::{
    io::{Error, ErrorKind, Result},
    sync::Mutex,
};

use crate::disk::{
    block_device::BlockDevice,
    types::{Block, BLOCK_SIZE, CAPACITY},
};

/// 内存中的阵列后端，不做持久化
#[derive(Debug)]
pub struct MemDisk {
    data: Mutex<Vec<u8>>,
}

impl MemDisk {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(vec![0u8; CAPACITY]),
        }
    }

    fn range(block_id: u64) -> Result<std::ops::Range<usize>> {
        let start = block_id as usize * BLOCK_SIZE;
        if start + BLOCK_SIZE > CAPACITY {
            return Err(Error::new(ErrorKind::InvalidInput, "block id out of range"));
        }
        Ok(start..start + BLOCK_SIZE)
    }
}

impl Default for MemDisk {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockDevice for MemDisk {
    fn read_block(&self, block_id: u64, buf: &mut Block) -> Result<()> {
        let range = Self::range(block_id)?;
        let data = self
            .data
            .lock()
            .map_err(|_| Error::new(ErrorKind::Other, "memory disk lock poisoned"))?;
        buf.copy_from_slice(&data[range]);
        Ok(())
    }

    fn write_block(&self, block_id: u64, buf: &Block) -> Result<()> {
        let range = Self::range(block_id)?;
        let mut data = self
            .data
            .lock()
            .map_err(|_| Error::new(ErrorKind::Other, "memory disk lock poisoned"))?;
        data[range].copy_from_slice(buf);
        Ok(())
    }
}
