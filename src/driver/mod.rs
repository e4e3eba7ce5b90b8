//! 线性地址驱动：把 JBOD 阵列呈现为一段连续的字节地址空间。
//!
//! 每次请求先整体校验，然后按块拆分：定位磁盘与块，经由一个块大小的
//! 暂存缓冲区与设备交换整块数据，再把其中需要的部分拷进/拷出调用方的缓冲区。

use log::{debug, trace, warn};

use crate::{
    disk::{Block, Command, JbodDevice, BLOCK_SIZE},
    driver::{addr::Location, validate::check_request},
};

pub mod addr;
pub mod config;
pub mod error;
pub mod validate;

pub use error::{MdadmError, Result};

#[derive(Debug)]
pub struct Mdadm<J: JbodDevice> {
    device: J,     // 底层设备原语
    mounted: bool, // 挂载状态
}

impl<J: JbodDevice> Mdadm<J> {
    pub fn new(device: J) -> Self {
        Self {
            device,
            mounted: false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn device(&self) -> &J {
        &self.device
    }

    /// 交还底层设备
    pub fn into_inner(self) -> J {
        self.device
    }

    pub fn mount(&mut self) -> Result<()> {
        if self.mounted {
            return Err(MdadmError::AlreadyMounted);
        }
        self.execute(Command::Mount, None)?;
        self.mounted = true;
        debug!("mdadm: mounted");
        Ok(())
    }

    pub fn unmount(&mut self) -> Result<()> {
        if !self.mounted {
            return Err(MdadmError::AlreadyUnmounted);
        }
        self.execute(Command::Unmount, None)?;
        self.mounted = false;
        debug!("mdadm: unmounted");
        Ok(())
    }

    /// 从 `addr` 开始读 `len` 字节到 `buf`，返回读到的字节数
    ///
    /// 中途设备出错时整个调用失败，`buf` 里可能已经写入了一部分数据。
    pub fn read(&mut self, addr: u32, len: u32, buf: Option<&mut [u8]>) -> Result<usize> {
        let len = check_request(self.mounted, addr, len, buf.as_deref().map(<[u8]>::len))?;
        if len == 0 {
            return Ok(0);
        }
        let buf = buf.ok_or(MdadmError::InvalidBuffer)?;

        let mut cur = addr as usize;
        let mut remaining = len;
        let mut total = 0;
        let mut block: Block = [0; BLOCK_SIZE];

        while remaining > 0 {
            let loc = Location::from_addr(cur);
            self.seek(&loc)?;
            self.execute(Command::ReadBlock, Some(&mut block))?;

            let chunk = loc.room().min(remaining);
            buf[total..total + chunk].copy_from_slice(&block[loc.offset..loc.offset + chunk]);
            trace!("mdadm: read {} bytes at {}", chunk, loc);

            cur += chunk;
            remaining -= chunk;
            total += chunk;
        }

        Ok(total)
    }

    /// 把 `buf` 的前 `len` 字节写到 `addr` 开始的位置，返回写入的字节数
    ///
    /// 设备只能整块交换，所以每个块都是先读出、修改、再写回。
    pub fn write(&mut self, addr: u32, len: u32, buf: Option<&[u8]>) -> Result<usize> {
        let len = check_request(self.mounted, addr, len, buf.map(<[u8]>::len))?;
        if len == 0 {
            return Ok(0);
        }
        let buf = buf.ok_or(MdadmError::InvalidBuffer)?;

        let mut cur = addr as usize;
        let mut remaining = len;
        let mut total = 0;
        let mut block: Block = [0; BLOCK_SIZE];

        while remaining > 0 {
            let loc = Location::from_addr(cur);
            self.seek(&loc)?;
            self.execute(Command::ReadBlock, Some(&mut block))?;

            let chunk = loc.room().min(remaining);
            block[loc.offset..loc.offset + chunk].copy_from_slice(&buf[total..total + chunk]);

            // 读块之后设备游标已经前移，写回前重新定位
            self.seek(&loc)?;
            self.execute(Command::WriteBlock, Some(&mut block))?;
            trace!("mdadm: wrote {} bytes at {}", chunk, loc);

            cur += chunk;
            remaining -= chunk;
            total += chunk;
        }

        Ok(total)
    }

    /// 读满整个 `buf`
    pub fn read_at(&mut self, addr: u32, buf: &mut [u8]) -> Result<usize> {
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        self.read(addr, len, Some(buf))
    }

    /// 写入整个 `buf`
    pub fn write_at(&mut self, addr: u32, buf: &[u8]) -> Result<usize> {
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        self.write(addr, len, Some(buf))
    }

    /// 包含 `addr` 的那个块的签名
    pub fn sign(&mut self, addr: u32) -> Result<u32> {
        let mut block: Block = [0; BLOCK_SIZE];
        check_request(self.mounted, addr, 1, Some(block.len()))?;

        let loc = Location::from_addr(addr as usize);
        self.seek(&loc)?;
        self.execute(Command::SignBlock, Some(&mut block))?;
        Ok(u32::from_le_bytes([block[0], block[1], block[2], block[3]]))
    }

    fn seek(&mut self, loc: &Location) -> Result<()> {
        self.execute(Command::SeekToDisk(loc.disk as u32), None)?;
        self.execute(Command::SeekToBlock(loc.block as u32), None)
    }

    fn execute(&mut self, cmd: Command, block: Option<&mut Block>) -> Result<()> {
        self.device.operation(cmd.encode(), block).map_err(|e| {
            warn!("mdadm: {:?} failed: {}", cmd, e);
            MdadmError::DeviceFault(e)
        })
    }
}
