use crate::disk::CAPACITY;

// 单次 read/write 最多传输的字节数
pub const MAX_IO_SIZE: usize = 1024;

// 驱动对外暴露的线性地址空间大小，与阵列容量一致
pub const ADDRESS_SPACE: usize = CAPACITY;

// 传统接口的返回码
pub const CODE_OUT_OF_BOUNDS: i32 = -1;
pub const CODE_LENGTH_EXCEEDED: i32 = -2;
pub const CODE_NOT_MOUNTED: i32 = -3;
pub const CODE_INVALID_BUFFER: i32 = -4;
pub const CODE_FAILURE: i32 = -1;
