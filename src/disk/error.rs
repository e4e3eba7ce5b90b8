use std::fmt;

/// 设备最近一次命令的错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JbodError {
    #[default]
    NoError,
    Unmounted,        // 设备未挂载
    AlreadyMounted,   // 重复挂载
    AlreadyUnmounted, // 重复卸载
    // 模拟器没有块缓存，保留这两个错误号以对齐传统的错误号顺序
    #[allow(dead_code)]
    CacheLoadFail, // 缓存加载失败
    #[allow(dead_code)]
    CacheWriteFail, // 缓存写入失败
    BadCmd,           // 无法识别的命令字
    BadDiskNum,       // 磁盘号越界
    BadBlockNum,      // 块号越界
    BadRead,          // 读块失败
    BadWrite,         // 写块失败
}

impl JbodError {
    /// 错误分类对应的可读描述
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoError => "no error",
            Self::Unmounted => "JBOD is unmounted",
            Self::AlreadyMounted => "JBOD is already mounted",
            Self::AlreadyUnmounted => "JBOD is already unmounted",
            Self::CacheLoadFail => "failed to load block cache",
            Self::CacheWriteFail => "failed to write block cache",
            Self::BadCmd => "invalid command",
            Self::BadDiskNum => "invalid disk number",
            Self::BadBlockNum => "invalid block number",
            Self::BadRead => "failed to read block",
            Self::BadWrite => "failed to write block",
        }
    }

    /// 传统的错误号
    pub fn errno(&self) -> i32 {
        *self as i32
    }
}

impl fmt::Display for JbodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for JbodError {}

/// 镜像文件相关错误
#[derive(Debug)]
pub enum ImageError {
    Io(std::io::Error),     // 底层 I/O 错误
    Encode(bincode::Error), // 镜像头编解码失败
    Corrupted(String),      // 镜像头不可识别或几何参数不符
}

impl From<std::io::Error> for ImageError {
    fn from(e: std::io::Error) -> Self {
        ImageError::Io(e)
    }
}

impl From<bincode::Error> for ImageError {
    fn from(e: bincode::Error) -> Self {
        ImageError::Encode(e)
    }
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Image I/O error: {}", e),
            Self::Encode(e) => write!(f, "Image header encoding error: {}", e),
            Self::Corrupted(desc) => write!(f, "Image corrupted: {}", desc),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Encode(e) => Some(e),
            Self::Corrupted(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_follows_legacy_order() {
        assert_eq!(JbodError::NoError.errno(), 0);
        assert_eq!(JbodError::CacheLoadFail.errno(), 4);
        assert_eq!(JbodError::CacheWriteFail.errno(), 5);
        assert_eq!(JbodError::BadWrite.errno(), 10);
        assert_eq!(JbodError::BadDiskNum.to_string(), "invalid disk number");
    }
}
