use log::trace;

use crate::disk::{
    block_device::BlockDevice,
    command::Command,
    error::JbodError,
    types::{flat_block_id, Block, BLOCKS_PER_DISK, BLOCK_SIZE, NUM_DISKS},
};

/// 设备原语：一次执行一条打包好的命令，至多交换一个块
///
/// 返回 `Ok(())` 表示成功；失败时的分类同时可以通过 [`JbodDevice::last_error`] 查询。
pub trait JbodDevice {
    fn operation(&mut self, op: u32, block: Option<&mut Block>) -> Result<(), JbodError>;
    fn last_error(&self) -> JbodError;
}

/// JBOD 设备模拟器
///
/// 记住当前磁盘与当前块；读写一个块之后当前块自动前移。
#[derive(Debug)]
pub struct Jbod<D: BlockDevice> {
    disk: D,
    mounted: bool,
    current_disk: usize,
    current_block: usize,
    last_error: JbodError,
}

impl<D: BlockDevice> Jbod<D> {
    pub fn new(disk: D) -> Self {
        Self {
            disk,
            mounted: false,
            current_disk: 0,
            current_block: 0,
            last_error: JbodError::NoError,
        }
    }

    pub fn disk(&self) -> &D {
        &self.disk
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// 当前 (磁盘号, 块号)
    pub fn position(&self) -> (usize, usize) {
        (self.current_disk, self.current_block)
    }

    fn dispatch(&mut self, cmd: Command, block: Option<&mut Block>) -> Result<(), JbodError> {
        match cmd {
            Command::Mount => {
                if self.mounted {
                    return Err(JbodError::AlreadyMounted);
                }
                self.mounted = true;
                self.current_disk = 0;
                self.current_block = 0;
            }
            Command::Unmount => {
                if !self.mounted {
                    return Err(JbodError::AlreadyUnmounted);
                }
                self.mounted = false;
            }
            _ if !self.mounted => return Err(JbodError::Unmounted),
            Command::SeekToDisk(disk) => {
                let disk = disk as usize;
                if disk >= NUM_DISKS {
                    return Err(JbodError::BadDiskNum);
                }
                self.current_disk = disk;
                self.current_block = 0;
            }
            Command::SeekToBlock(block) => {
                let block = block as usize;
                if block >= BLOCKS_PER_DISK {
                    return Err(JbodError::BadBlockNum);
                }
                self.current_block = block;
            }
            Command::ReadBlock => {
                let buf = block.ok_or(JbodError::BadRead)?;
                self.disk
                    .read_block(self.id(), buf)
                    .map_err(|_| JbodError::BadRead)?;
                self.advance();
            }
            Command::WriteBlock => {
                let buf = block.ok_or(JbodError::BadWrite)?;
                self.disk
                    .write_block(self.id(), buf)
                    .map_err(|_| JbodError::BadWrite)?;
                self.advance();
            }
            Command::SignBlock => {
                let buf = block.ok_or(JbodError::BadRead)?;
                let mut data: Block = [0; BLOCK_SIZE];
                self.disk
                    .read_block(self.id(), &mut data)
                    .map_err(|_| JbodError::BadRead)?;
                buf.fill(0);
                buf[..4].copy_from_slice(&signature(&data).to_le_bytes());
            }
        }
        Ok(())
    }

    fn id(&self) -> u64 {
        flat_block_id(self.current_disk, self.current_block)
    }

    // 块号走到磁盘末尾后接着下一块磁盘
    fn advance(&mut self) {
        self.current_block += 1;
        if self.current_block == BLOCKS_PER_DISK {
            self.current_block = 0;
            self.current_disk = (self.current_disk + 1) % NUM_DISKS;
        }
    }
}

impl<D: BlockDevice> JbodDevice for Jbod<D> {
    fn operation(&mut self, op: u32, block: Option<&mut Block>) -> Result<(), JbodError> {
        let result = match Command::decode(op) {
            Some(cmd) => {
                trace!(
                    "jbod: {:?} at disk {} block {}",
                    cmd,
                    self.current_disk,
                    self.current_block
                );
                self.dispatch(cmd, block)
            }
            None => Err(JbodError::BadCmd),
        };
        self.last_error = match result {
            Ok(()) => JbodError::NoError,
            Err(e) => e,
        };
        result
    }

    fn last_error(&self) -> JbodError {
        self.last_error
    }
}

/// 块签名：FNV-1a 32 位哈希
pub fn signature(data: &Block) -> u32 {
    data.iter().fold(0x811c_9dc5u32, |hash, &b| {
        (hash ^ b as u32).wrapping_mul(0x0100_0193)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::mem_disk::MemDisk;

    fn mounted() -> Jbod<MemDisk> {
        let mut jbod = Jbod::new(MemDisk::new());
        jbod.operation(Command::Mount.encode(), None).unwrap();
        jbod
    }

    #[test]
    fn commands_require_mount() {
        let mut jbod = Jbod::new(MemDisk::new());
        let mut buf: Block = [0; BLOCK_SIZE];
        assert_eq!(
            jbod.operation(Command::ReadBlock.encode(), Some(&mut buf)),
            Err(JbodError::Unmounted)
        );
        assert_eq!(jbod.last_error(), JbodError::Unmounted);
    }

    #[test]
    fn mount_and_unmount_are_not_repeatable() {
        let mut jbod = mounted();
        assert_eq!(
            jbod.operation(Command::Mount.encode(), None),
            Err(JbodError::AlreadyMounted)
        );
        jbod.operation(Command::Unmount.encode(), None).unwrap();
        assert_eq!(jbod.last_error(), JbodError::NoError);
        assert_eq!(
            jbod.operation(Command::Unmount.encode(), None),
            Err(JbodError::AlreadyUnmounted)
        );
    }

    #[test]
    fn seeks_are_range_checked() {
        let mut jbod = mounted();
        assert_eq!(
            jbod.operation(Command::SeekToDisk(NUM_DISKS as u32).encode(), None),
            Err(JbodError::BadDiskNum)
        );
        jbod.operation(Command::SeekToDisk(3).encode(), None).unwrap();
        jbod.operation(Command::SeekToBlock(9).encode(), None).unwrap();
        assert_eq!(jbod.position(), (3, 9));
    }

    #[test]
    fn unknown_command_is_bad_cmd() {
        let mut jbod = mounted();
        assert_eq!(jbod.operation(9 << 12, None), Err(JbodError::BadCmd));
        assert_eq!(jbod.last_error(), JbodError::BadCmd);
    }

    #[test]
    fn block_io_advances_and_wraps_to_next_disk() {
        let mut jbod = mounted();
        jbod.operation(Command::SeekToDisk(2).encode(), None).unwrap();
        jbod.operation(
            Command::SeekToBlock(BLOCKS_PER_DISK as u32 - 1).encode(),
            None,
        )
        .unwrap();

        let mut buf: Block = [0x42; BLOCK_SIZE];
        jbod.operation(Command::WriteBlock.encode(), Some(&mut buf))
            .unwrap();
        assert_eq!(jbod.position(), (3, 0));

        jbod.operation(Command::SeekToDisk(2).encode(), None).unwrap();
        jbod.operation(
            Command::SeekToBlock(BLOCKS_PER_DISK as u32 - 1).encode(),
            None,
        )
        .unwrap();
        let mut out: Block = [0; BLOCK_SIZE];
        jbod.operation(Command::ReadBlock.encode(), Some(&mut out))
            .unwrap();
        assert_eq!(out, [0x42; BLOCK_SIZE]);
    }

    #[test]
    fn block_io_needs_a_buffer() {
        let mut jbod = mounted();
        assert_eq!(
            jbod.operation(Command::ReadBlock.encode(), None),
            Err(JbodError::BadRead)
        );
        assert_eq!(
            jbod.operation(Command::WriteBlock.encode(), None),
            Err(JbodError::BadWrite)
        );
    }

    #[test]
    fn sign_block_reports_the_block_hash() {
        let mut jbod = mounted();
        let mut data: Block = [0; BLOCK_SIZE];
        data[..5].copy_from_slice(b"hello");
        jbod.operation(Command::WriteBlock.encode(), Some(&mut data))
            .unwrap();
        jbod.operation(Command::SeekToBlock(0).encode(), None).unwrap();

        let mut sig: Block = [0xFF; BLOCK_SIZE];
        jbod.operation(Command::SignBlock.encode(), Some(&mut sig))
            .unwrap();
        assert_eq!(sig[..4], signature(&data).to_le_bytes());
        assert!(sig[4..].iter().all(|&b| b == 0));
        assert_eq!(jbod.position(), (0, 0));
    }
}
