//! 设备命令字的编码与解码。
//!
//! 命令字是一个 32 位整数：
//!
//! ```text
//!  31        18 17    12 11          4 3      0
//! +------------+--------+-------------+--------+
//! |  reserved  |  cmd   |  block id   |  ....  |   SeekToBlock
//! |  reserved  |  cmd   |      disk id         |   SeekToDisk
//! +------------+--------+-------------+--------+
//! ```

/// 命令号所在的位移
pub const CMD_SHIFT: u32 = 12;
/// SeekToBlock 中块号的位移
pub const BLOCK_SHIFT: u32 = 4;

const CMD_MASK: u32 = 0x3F;
const DISK_MASK: u32 = 0xFFF;
const BLOCK_MASK: u32 = 0xFF;

/// 设备支持的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Mount,
    Unmount,
    SeekToDisk(u32),
    SeekToBlock(u32),
    ReadBlock,
    WriteBlock,
    SignBlock,
}

impl Command {
    fn code(&self) -> u32 {
        match self {
            Self::Mount => 0,
            Self::Unmount => 1,
            Self::SeekToDisk(_) => 2,
            Self::SeekToBlock(_) => 3,
            Self::ReadBlock => 4,
            Self::WriteBlock => 5,
            Self::SignBlock => 6,
        }
    }

    /// 打包成设备能识别的命令字
    pub fn encode(&self) -> u32 {
        let operand = match *self {
            Self::SeekToDisk(disk) => disk & DISK_MASK,
            Self::SeekToBlock(block) => (block & BLOCK_MASK) << BLOCK_SHIFT,
            _ => 0,
        };
        (self.code() << CMD_SHIFT) | operand
    }

    /// 解析命令字，未知命令号返回 None
    pub fn decode(op: u32) -> Option<Self> {
        let cmd = match (op >> CMD_SHIFT) & CMD_MASK {
            0 => Self::Mount,
            1 => Self::Unmount,
            2 => Self::SeekToDisk(op & DISK_MASK),
            3 => Self::SeekToBlock((op >> BLOCK_SHIFT) & BLOCK_MASK),
            4 => Self::ReadBlock,
            5 => Self::WriteBlock,
            6 => Self::SignBlock,
            _ => return None,
        };
        // 保留位必须为 0
        if op >> CMD_SHIFT > CMD_MASK {
            return None;
        }
        Some(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_the_legacy_layout() {
        assert_eq!(Command::Mount.encode(), 0);
        assert_eq!(Command::Unmount.encode(), 1 << 12);
        assert_eq!(Command::SeekToDisk(7).encode(), (2 << 12) | 7);
        assert_eq!(Command::SeekToBlock(200).encode(), (3 << 12) | (200 << 4));
        assert_eq!(Command::ReadBlock.encode(), 4 << 12);
        assert_eq!(Command::WriteBlock.encode(), 5 << 12);
        assert_eq!(Command::SignBlock.encode(), 6 << 12);
    }

    #[test]
    fn decode_recovers_operands() {
        assert_eq!(
            Command::decode(Command::SeekToDisk(15).encode()),
            Some(Command::SeekToDisk(15))
        );
        assert_eq!(
            Command::decode(Command::SeekToBlock(255).encode()),
            Some(Command::SeekToBlock(255))
        );
        // 超出阵列范围的磁盘号照样能解出来，由设备判断是否合法
        assert_eq!(Command::decode((2 << 12) | 40), Some(Command::SeekToDisk(40)));
    }

    #[test]
    fn decode_rejects_unknown_commands() {
        assert_eq!(Command::decode(7 << 12), None);
        assert_eq!(Command::decode(63 << 12), None);
        assert_eq!(Command::decode(1 << 20), None);
    }
}
