use std::fmt;

use crate::disk::{BLOCKS_PER_DISK, BLOCK_SIZE, DISK_SIZE};

/// 线性地址拆分后的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub disk: usize,   // 磁盘号
    pub block: usize,  // 磁盘内的块号
    pub offset: usize, // 块内偏移
}

impl Location {
    /// 线性地址 -> (磁盘, 块, 块内偏移)
    pub fn from_addr(addr: usize) -> Self {
        Self {
            disk: addr / DISK_SIZE,
            block: (addr / BLOCK_SIZE) % BLOCKS_PER_DISK,
            offset: addr % BLOCK_SIZE,
        }
    }

    pub fn to_addr(&self) -> usize {
        self.disk * DISK_SIZE + self.block * BLOCK_SIZE + self.offset
    }

    /// 当前块内剩余可传输的字节数
    pub fn room(&self) -> usize {
        BLOCK_SIZE - self.offset
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "disk {} / block {} / offset {}",
            self.disk, self.block, self.offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::{CAPACITY, NUM_DISKS};

    #[test]
    fn every_address_round_trips() {
        for addr in 0..CAPACITY {
            let loc = Location::from_addr(addr);
            assert!(loc.disk < NUM_DISKS);
            assert!(loc.block < BLOCKS_PER_DISK);
            assert!(loc.offset < BLOCK_SIZE);
            assert_eq!(loc.to_addr(), addr);
        }
    }

    #[test]
    fn boundaries_land_on_the_next_unit() {
        assert_eq!(
            Location::from_addr(BLOCK_SIZE),
            Location { disk: 0, block: 1, offset: 0 }
        );
        assert_eq!(
            Location::from_addr(DISK_SIZE - 1),
            Location {
                disk: 0,
                block: BLOCKS_PER_DISK - 1,
                offset: BLOCK_SIZE - 1
            }
        );
        assert_eq!(
            Location::from_addr(DISK_SIZE),
            Location { disk: 1, block: 0, offset: 0 }
        );
        assert_eq!(
            Location::from_addr(CAPACITY - 1),
            Location {
                disk: NUM_DISKS - 1,
                block: BLOCKS_PER_DISK - 1,
                offset: BLOCK_SIZE - 1
            }
        );
    }

    #[test]
    fn room_counts_to_block_end() {
        assert_eq!(Location::from_addr(0).room(), BLOCK_SIZE);
        assert_eq!(Location::from_addr(BLOCK_SIZE - 10).room(), 10);
    }
}
