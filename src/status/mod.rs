//! 状态码与属性标识
//!
//! 包含：
//! - Codec: FourCC 编解码
//! - Known: AudioToolbox 常见错误码和分类
//! - StatusCode / PropertyId: 32-bit 值的强类型包装

pub mod codec;
pub mod known;

use std::fmt;
use std::str::FromStr;

use crate::error::{CoreAudioError, Result};

pub use codec::{decode, encode, is_printable};
pub use known::ErrorCategory;

/// 外部 API 返回的 32-bit 状态码（OSStatus）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StatusCode(pub i32);

impl StatusCode {
    /// 成功
    pub const NO_ERR: StatusCode = StatusCode(0);

    /// 由 4 个字节构造（编译期可用）
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes) as i32)
    }

    /// 由 4 字节字符串构造
    pub fn from_fourcc(code: &str) -> Result<Self> {
        codec::encode(code).map(Self)
    }

    #[inline]
    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_printable(self) -> bool {
        codec::is_printable(self.0)
    }

    pub fn category(self) -> Option<ErrorCategory> {
        known::category(self)
    }

    /// 非零状态转换为错误
    pub fn into_result(self, operation: &'static str) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(CoreAudioError::from_status(self, operation))
        }
    }
}

impl From<i32> for StatusCode {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<StatusCode> for i32 {
    fn from(value: StatusCode) -> Self {
        value.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::decode(self.0))
    }
}

/// 解析状态码
///
/// 接受：4 字符标签（`fmt?`）、带引号的标签（`'fmt?'`）、十进制、`0x` 十六进制
impl FromStr for StatusCode {
    type Err = CoreAudioError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();

        if trimmed == codec::NO_ERR_TEXT {
            return Ok(Self::NO_ERR);
        }

        if let Some(tag) = trimmed
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            return Self::from_fourcc(tag);
        }

        if let Some(hex) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            return u32::from_str_radix(hex, 16)
                .map(|v| Self(v as i32))
                .map_err(|e| CoreAudioError::InvalidInput(format!("{:?}: {}", s, e)));
        }

        if let Ok(v) = trimmed.parse::<i32>() {
            return Ok(Self(v));
        }

        // 未加引号的标签保留原始空白（例如 "fmt "）
        Self::from_fourcc(s)
    }
}

/// 属性标识，与状态码共用 FourCC 命名空间
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub u32);

impl PropertyId {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }

    pub fn from_fourcc(code: &str) -> Result<Self> {
        codec::encode(code).map(|v| Self(v as u32))
    }
}

impl From<u32> for PropertyId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// 可打印时显示 `'abcd'`，否则显示十六进制
impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if codec::is_printable(self.0 as i32) {
            f.write_str(&codec::decode(self.0 as i32))
        } else {
            write!(f, "0x{:08X}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(StatusCode::NO_ERR.to_string(), "noErr");
        assert_eq!(StatusCode(-50).to_string(), "-50");
        assert_eq!(StatusCode::from_bytes(*b"wht?").to_string(), "'wht?'");
    }

    #[test]
    fn test_from_bytes_matches_encode() {
        assert_eq!(
            StatusCode::from_bytes(*b"!dat"),
            StatusCode::from_fourcc("!dat").unwrap()
        );
        assert_eq!(PropertyId::from_bytes(*b"fmt ").0, 0x666D7420);
        assert_eq!(PropertyId::from_fourcc("fmt ").unwrap().0, 0x666D7420);
    }

    #[test]
    fn test_property_id_display() {
        assert_eq!(PropertyId::from_bytes(*b"dfmt").to_string(), "'dfmt'");
        assert_eq!(PropertyId(0).to_string(), "0x00000000");
        assert_eq!(PropertyId(5).to_string(), "0x00000005");
        assert_eq!(PropertyId(0xFFFF_FFFF).to_string(), "0xFFFFFFFF");
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("noErr".parse::<StatusCode>().unwrap(), StatusCode::NO_ERR);
        assert_eq!("-43".parse::<StatusCode>().unwrap(), StatusCode(-43));
        assert_eq!("0x666D743F".parse::<StatusCode>().unwrap().to_string(), "'fmt?'");
        assert_eq!("'fmt?'".parse::<StatusCode>().unwrap().0, 0x666D743F);
        assert_eq!("fmt?".parse::<StatusCode>().unwrap().0, 0x666D743F);
        assert_eq!("fmt ".parse::<StatusCode>().unwrap().0, 0x666D7420);
        assert!("toolong".parse::<StatusCode>().is_err());
        assert!("0xZZ".parse::<StatusCode>().is_err());
    }

    #[test]
    fn test_into_result() {
        assert!(StatusCode::NO_ERR.into_result("op").is_ok());
        let err = StatusCode(-43).into_result("AudioFileOpenURL").unwrap_err();
        assert_eq!(err.status(), StatusCode(-43));
    }
}
