use std::{
    fs::{File, OpenOptions},
    io::{Error, ErrorKind, Read, Result, Seek, SeekFrom, Write},
    path::Path,
    sync::{mpsc::Sender, Mutex},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    disk::{
        block_device::BlockDevice,
        error::ImageError,
        types::{Block, BLOCKS_PER_DISK, BLOCK_COUNT, BLOCK_SIZE, CAPACITY, NUM_DISKS},
    },
    shell::BootProgress,
};

/// 镜像魔数，用于识别镜像文件
pub const IMAGE_MAGIC: u64 = 0x4A42_4F44_494D_4731; // "JBODIMG1"

/// 镜像头占用一个块，数据区紧随其后
pub const HEADER_SIZE: u64 = BLOCK_SIZE as u64;

/// 镜像文件总大小
pub const IMAGE_SIZE: u64 = HEADER_SIZE + CAPACITY as u64;

/// 写在镜像第 0 块的元信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHeader {
    pub magic: u64,
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /** 几何参数 */
    pub num_disks: u32,
    pub blocks_per_disk: u32,
    pub block_size: u32,
}

impl ImageHeader {
    fn new() -> Self {
        Self {
            magic: IMAGE_MAGIC,
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            num_disks: NUM_DISKS as u32,
            blocks_per_disk: BLOCKS_PER_DISK as u32,
            block_size: BLOCK_SIZE as u32,
        }
    }

    fn validate(&self) -> std::result::Result<(), ImageError> {
        if self.magic != IMAGE_MAGIC {
            return Err(ImageError::Corrupted(format!(
                "bad magic {:#018x}",
                self.magic
            )));
        }
        let geometry = (self.num_disks, self.blocks_per_disk, self.block_size);
        let expected = (NUM_DISKS as u32, BLOCKS_PER_DISK as u32, BLOCK_SIZE as u32);
        if geometry != expected {
            return Err(ImageError::Corrupted(format!(
                "geometry {:?} does not match {:?} (disks, blocks/disk, block size)",
                geometry, expected
            )));
        }
        Ok(())
    }
}

/// 宿主机文件作为阵列后端
#[derive(Debug)]
pub struct FileDisk {
    file: Mutex<File>,
    header: ImageHeader,
}

impl FileDisk {
    pub fn open<P: AsRef<Path>>(
        path: P,
        tx: &Sender<BootProgress>,
    ) -> std::result::Result<Self, ImageError> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        let header = if file.metadata()?.len() == 0 {
            let _ = tx.send(BootProgress::Step("🪶 Allocating disk image..."));

            let header = ImageHeader::new();
            let mut block: Block = [0; BLOCK_SIZE];
            let encoded = bincode::serialize(&header)?;
            block[..encoded.len()].copy_from_slice(&encoded);

            file.write_all(&block)?;
            file.set_len(IMAGE_SIZE)?;
            header
        } else {
            let _ = tx.send(BootProgress::Step("🔍 Checking disk image..."));

            let mut block: Block = [0; BLOCK_SIZE];
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut block)?;
            let header: ImageHeader = bincode::deserialize(&block)?;
            header.validate()?;

            if file.metadata()?.len() < IMAGE_SIZE {
                return Err(ImageError::Corrupted("image is truncated".to_string()));
            }
            header
        };

        let _ = tx.send(BootProgress::Progress(50));

        Ok(Self {
            file: Mutex::new(file),
            header,
        })
    }

    pub fn header(&self) -> &ImageHeader {
        &self.header
    }

    /// 将所有数据块清零，每写完一块回调一次已完成的块数
    pub fn format(&self, mut on_progress: impl FnMut(usize)) -> Result<()> {
        let zero: Block = [0; BLOCK_SIZE];
        for i in 0..BLOCK_COUNT {
            self.write_block(i as u64, &zero)?;
            on_progress(i + 1);
        }
        self.lock()?.sync_data()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| Error::new(ErrorKind::Other, "disk image lock poisoned"))
    }

    fn offset(block_id: u64) -> Result<u64> {
        if block_id >= BLOCK_COUNT as u64 {
            return Err(Error::new(ErrorKind::InvalidInput, "block id out of range"));
        }
        Ok(HEADER_SIZE + block_id * BLOCK_SIZE as u64)
    }
}

impl BlockDevice for FileDisk {
    fn read_block(&self, block_id: u64, buf: &mut Block) -> Result<()> {
        let offset = Self::offset(block_id)?;
        let mut file = self.lock()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn write_block(&self, block_id: u64, buf: &Block) -> Result<()> {
        let offset = Self::offset(block_id)?;
        let mut file = self.lock()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(buf)?;
        Ok(())
    }
}
