use crate::driver::{
    config::{ADDRESS_SPACE, MAX_IO_SIZE},
    error::{MdadmError, Result},
};

/// 检查一次 read/write 请求，返回需要传输的字节数
///
/// 检查顺序固定，第一个失败的检查决定返回的错误：
/// 挂载 -> 零长度 -> 长度上限 -> 地址范围 -> 缓冲区。
/// `buf_len` 为 `None` 表示调用方没有提供缓冲区。
pub fn check_request(mounted: bool, addr: u32, len: u32, buf_len: Option<usize>) -> Result<usize> {
    if !mounted {
        return Err(MdadmError::NotMounted);
    }
    if len == 0 {
        return Ok(0);
    }
    let n = len as usize;
    if n > MAX_IO_SIZE {
        return Err(MdadmError::LengthExceeded {
            len,
            max: MAX_IO_SIZE,
        });
    }
    match (addr as usize).checked_add(n) {
        Some(end) if end <= ADDRESS_SPACE => {}
        _ => return Err(MdadmError::OutOfBounds { addr, len }),
    }
    match buf_len {
        Some(available) if available >= n => Ok(n),
        _ => Err(MdadmError::InvalidBuffer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_check_comes_before_zero_length() {
        assert_eq!(check_request(false, 0, 0, None), Err(MdadmError::NotMounted));
        assert_eq!(check_request(true, 0, 0, None), Ok(0));
    }

    #[test]
    fn length_cap_comes_before_bounds() {
        assert_eq!(
            check_request(true, u32::MAX, 1025, Some(2048)),
            Err(MdadmError::LengthExceeded { len: 1025, max: 1024 })
        );
        assert_eq!(check_request(true, 0, 1024, Some(1024)), Ok(1024));
    }

    #[test]
    fn range_end_is_exclusive() {
        let last = (ADDRESS_SPACE - 16) as u32;
        assert_eq!(check_request(true, last, 16, Some(16)), Ok(16));
        assert_eq!(
            check_request(true, last, 17, Some(17)),
            Err(MdadmError::OutOfBounds { addr: last, len: 17 })
        );
    }

    #[test]
    fn huge_address_does_not_wrap() {
        assert_eq!(
            check_request(true, u32::MAX, 2, Some(2)),
            Err(MdadmError::OutOfBounds { addr: u32::MAX, len: 2 })
        );
    }

    #[test]
    fn buffer_checked_last() {
        assert_eq!(check_request(true, 0, 5, None), Err(MdadmError::InvalidBuffer));
        assert_eq!(check_request(true, 0, 5, Some(4)), Err(MdadmError::InvalidBuffer));
        assert_eq!(
            check_request(true, u32::MAX, 5, None),
            Err(MdadmError::OutOfBounds { addr: u32::MAX, len: 5 })
        );
    }
}
