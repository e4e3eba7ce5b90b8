use static_assertions::const_assert;

/// 阵列中的磁盘数量
pub const NUM_DISKS: usize = 16;

/// 每个块（Block）的大小：256 字节
/// 设备每次只交换一个完整的块。
pub const BLOCK_SIZE: usize = 256;

/// 每块磁盘包含的块数
pub const BLOCKS_PER_DISK: usize = 256;

/// 单块磁盘大小：256 * 256 = 64KB
pub const DISK_SIZE: usize = BLOCK_SIZE * BLOCKS_PER_DISK;

/// 整个线性地址空间的大小：16 * 64KB = 1MB
pub const CAPACITY: usize = NUM_DISKS * DISK_SIZE;

/// 阵列中的块总数
pub const BLOCK_COUNT: usize = NUM_DISKS * BLOCKS_PER_DISK;

// 地址换算用的是除法/取模，块号与偏移要能放进命令字的操作数位
const_assert!(BLOCK_SIZE.is_power_of_two());
const_assert!(BLOCKS_PER_DISK.is_power_of_two());
const_assert!(NUM_DISKS <= 16);
const_assert!(BLOCKS_PER_DISK <= 256);
const_assert!(CAPACITY <= u32::MAX as usize);

/// 一个块的数据（256 字节）
/// 所有设备读写都以 Block 为单位进行。
pub type Block = [u8; BLOCK_SIZE];

/// 数组内的扁平块号：disk * BLOCKS_PER_DISK + block
pub fn flat_block_id(disk: usize, block: usize) -> u64 {
    (disk * BLOCKS_PER_DISK + block) as u64
}
