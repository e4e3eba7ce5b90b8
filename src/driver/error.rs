use std::fmt;

use crate::{
    disk::JbodError,
    driver::config::{
        CODE_FAILURE, CODE_INVALID_BUFFER, CODE_LENGTH_EXCEEDED, CODE_NOT_MOUNTED,
        CODE_OUT_OF_BOUNDS,
    },
};

/// 驱动错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdadmError {
    NotMounted,                              // 未挂载
    AlreadyMounted,                          // 重复挂载
    AlreadyUnmounted,                        // 重复卸载
    LengthExceeded { len: u32, max: usize }, // 超过单次传输上限
    OutOfBounds { addr: u32, len: u32 },     // 越过地址空间末尾
    InvalidBuffer,                           // 缓冲区缺失或太短
    DeviceFault(JbodError),                  // 设备命令失败
}

impl MdadmError {
    /// 传统接口的负数返回码
    pub fn code(&self) -> i32 {
        match self {
            Self::OutOfBounds { .. } => CODE_OUT_OF_BOUNDS,
            Self::LengthExceeded { .. } => CODE_LENGTH_EXCEEDED,
            Self::NotMounted => CODE_NOT_MOUNTED,
            Self::InvalidBuffer => CODE_INVALID_BUFFER,
            Self::AlreadyMounted | Self::AlreadyUnmounted | Self::DeviceFault(_) => CODE_FAILURE,
        }
    }
}

impl From<JbodError> for MdadmError {
    fn from(e: JbodError) -> Self {
        MdadmError::DeviceFault(e)
    }
}

impl fmt::Display for MdadmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMounted => write!(f, "Device is not mounted"),
            Self::AlreadyMounted => write!(f, "Device is already mounted"),
            Self::AlreadyUnmounted => write!(f, "Device is already unmounted"),
            Self::LengthExceeded { len, max } => {
                write!(f, "Transfer of {} bytes exceeds the {} byte limit", len, max)
            }
            Self::OutOfBounds { addr, len } => write!(
                f,
                "Range {:#x}+{} runs past the end of the address space",
                addr, len
            ),
            Self::InvalidBuffer => write!(f, "Buffer is missing or too short"),
            Self::DeviceFault(e) => write!(f, "Device fault: {}", e),
        }
    }
}

impl std::error::Error for MdadmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DeviceFault(e) => Some(e),
            _ => None,
        }
    }
}

/// 驱动统一结果类型
pub type Result<T> = std::result::Result<T, MdadmError>;
