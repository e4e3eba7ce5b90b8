use std::{
    io::Result,
    path::PathBuf,
    sync::mpsc::Sender,
    thread,
    time::Duration,
};

use crate::{
    disk::{Block, BlockDevice, FileDisk, ImageHeader, Jbod, MemDisk, BLOCK_COUNT, BLOCK_SIZE},
    driver::Mdadm,
    shell::BootProgress,
};

/// Shell 使用的阵列后端：镜像文件或纯内存
#[derive(Debug)]
pub enum Backend {
    File(FileDisk),
    Memory(MemDisk),
}

impl Backend {
    pub fn header(&self) -> Option<&ImageHeader> {
        match self {
            Self::File(disk) => Some(disk.header()),
            Self::Memory(_) => None,
        }
    }

    pub fn format(&self, mut on_progress: impl FnMut(usize)) -> Result<()> {
        match self {
            Self::File(disk) => disk.format(on_progress),
            Self::Memory(disk) => {
                let zero: Block = [0; BLOCK_SIZE];
                for i in 0..BLOCK_COUNT {
                    disk.write_block(i as u64, &zero)?;
                    on_progress(i + 1);
                }
                Ok(())
            }
        }
    }
}

impl BlockDevice for Backend {
    fn read_block(&self, block_id: u64, buf: &mut Block) -> Result<()> {
        match self {
            Self::File(disk) => disk.read_block(block_id, buf),
            Self::Memory(disk) => disk.read_block(block_id, buf),
        }
    }

    fn write_block(&self, block_id: u64, buf: &Block) -> Result<()> {
        match self {
            Self::File(disk) => disk.write_block(block_id, buf),
            Self::Memory(disk) => disk.write_block(block_id, buf),
        }
    }
}

/// Shell 操作的驱动实例
pub type Driver = Mdadm<Jbod<Backend>>;

/// 打开后端并挂载驱动；`image` 为 `None` 时使用内存后端
pub fn perform_disk_initialization(image: Option<PathBuf>, tx: Sender<BootProgress>) {
    let _ = tx.send(BootProgress::Step("🧠 Initializing JBOD array..."));

    let backend = match image {
        Some(path) => match FileDisk::open(&path, &tx) {
            Ok(d) => Backend::File(d),
            Err(e) => {
                let _ = tx.send(BootProgress::Finished(Err(Box::new(e))));
                return;
            }
        },
        None => {
            let _ = tx.send(BootProgress::Step("🪶 Using in-memory disks..."));
            Backend::Memory(MemDisk::new())
        }
    };

    let _ = tx.send(BootProgress::Step("⚙️ Mounting array..."));

    let mut driver = Mdadm::new(Jbod::new(backend));
    if let Err(e) = driver.mount() {
        let _ = tx.send(BootProgress::Finished(Err(Box::new(e))));
        return;
    }

    for i in 50..=100 {
        let _ = tx.send(BootProgress::Progress(i));
        thread::sleep(Duration::from_millis(5));
    }

    let _ = tx.send(BootProgress::Finished(Ok(driver)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn memory_boot_finishes_mounted() {
        let (tx, rx) = mpsc::channel();
        perform_disk_initialization(None, tx);

        let finished = rx
            .iter()
            .find_map(|msg| match msg {
                BootProgress::Finished(result) => Some(result),
                _ => None,
            })
            .unwrap();
        let driver = finished.unwrap();
        assert!(driver.is_mounted());
        assert!(driver.device().disk().header().is_none());
    }

    #[test]
    fn memory_backend_format_clears_data() {
        let backend = Backend::Memory(MemDisk::new());
        backend.write_block(10, &[0x33; BLOCK_SIZE]).unwrap();

        let mut calls = 0;
        backend.format(|_| calls += 1).unwrap();
        assert_eq!(calls, BLOCK_COUNT);

        let mut buf: Block = [0xFF; BLOCK_SIZE];
        backend.read_block(10, &mut buf).unwrap();
        assert_eq!(buf, [0; BLOCK_SIZE]);
    }
}
