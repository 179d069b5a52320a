//! FourCC 编解码
//!
//! 32-bit 状态码按 big-endian 拆成 4 个字节：
//! - 全部可打印 ASCII → `'XXXX'`
//! - 否则 → 十进制整数
//! - 0 → `noErr`

use crate::error::{CoreAudioError, Result};

/// 成功状态的文本表示
pub const NO_ERR_TEXT: &str = "noErr";

/// 与 C `isprint` 一致：0x20..=0x7E
#[inline]
fn is_printable_byte(b: u8) -> bool {
    b.is_ascii_graphic() || b == b' '
}

/// 状态码的 4 个字节（寄存器中的高位在前，与主机字节序无关）
#[inline]
pub fn fourcc_bytes(status: i32) -> [u8; 4] {
    (status as u32).to_be_bytes()
}

/// 解码状态码为可读字符串
///
/// 对任意 32-bit 输入都有结果，不会 panic。
pub fn decode(status: i32) -> String {
    if status == 0 {
        return NO_ERR_TEXT.to_string();
    }

    let bytes = fourcc_bytes(status);
    if bytes.iter().all(|&b| is_printable_byte(b)) {
        // 可打印字节都是 ASCII，按字节逐个转换即可
        let mut out = String::with_capacity(6);
        out.push('\'');
        out.extend(bytes.iter().map(|&b| b as char));
        out.push('\'');
        out
    } else {
        status.to_string()
    }
}

/// 将 4 字节字符串打包为状态码
///
/// `[0]<<24 | [1]<<16 | [2]<<8 | [3]`，长度不是 4 字节时返回 `InvalidInput`。
pub fn encode(code: &str) -> Result<i32> {
    let bytes: [u8; 4] = code.as_bytes().try_into().map_err(|_| {
        CoreAudioError::InvalidInput(format!(
            "four-character code must be exactly 4 bytes, got {} ({:?})",
            code.len(),
            code
        ))
    })?;
    Ok(u32::from_be_bytes(bytes) as i32)
}

/// `decode` 是否会输出带引号的标签形式
pub fn is_printable(status: i32) -> bool {
    status != 0 && fourcc_bytes(status).iter().all(|&b| is_printable_byte(b))
}
