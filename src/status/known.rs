//! AudioToolbox 常见错误码及分类

use super::StatusCode;

/// 'typ?'
pub const AUDIO_FILE_UNSUPPORTED_FILE_TYPE: StatusCode = StatusCode::from_bytes(*b"typ?");
/// 'fmt?'（AudioFile 与 AudioFormat 共用同一个值）
pub const AUDIO_FILE_UNSUPPORTED_DATA_FORMAT: StatusCode = StatusCode::from_bytes(*b"fmt?");
/// 'pty?'
pub const AUDIO_FILE_UNSUPPORTED_PROPERTY: StatusCode = StatusCode::from_bytes(*b"pty?");
/// '!siz'
pub const AUDIO_FILE_BAD_PROPERTY_SIZE: StatusCode = StatusCode::from_bytes(*b"!siz");
/// 'prm?'
pub const AUDIO_FILE_PERMISSIONS: StatusCode = StatusCode::from_bytes(*b"prm?");
/// 'dta?'
pub const AUDIO_FILE_INVALID_FILE: StatusCode = StatusCode::from_bytes(*b"dta?");
/// 'wht?'
pub const AUDIO_FILE_UNSPECIFIED: StatusCode = StatusCode::from_bytes(*b"wht?");
/// fnfErr
pub const AUDIO_FILE_NOT_FOUND: StatusCode = StatusCode(-43);

/// 'prop'
pub const AUDIO_FORMAT_UNSUPPORTED_PROPERTY: StatusCode = StatusCode::from_bytes(*b"prop");
pub const AUDIO_FORMAT_UNSUPPORTED_DATA_FORMAT: StatusCode = AUDIO_FILE_UNSUPPORTED_DATA_FORMAT;
/// '!fmt'
pub const AUDIO_FORMAT_UNKNOWN_FORMAT: StatusCode = StatusCode::from_bytes(*b"!fmt");

pub const AUDIO_UNIT_INVALID_PROPERTY: StatusCode = StatusCode(-10879);
pub const AUDIO_UNIT_INVALID_PROPERTY_VALUE: StatusCode = StatusCode(-10851);
pub const AUDIO_UNIT_PROPERTY_NOT_WRITABLE: StatusCode = StatusCode(-10865);
pub const AUDIO_UNIT_PROPERTY_NOT_IN_USE: StatusCode = StatusCode(-10850);

/// 错误分类
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    File,
    Format,
    Property,
}

pub fn is_file_error(status: StatusCode) -> bool {
    matches!(
        status,
        AUDIO_FILE_UNSUPPORTED_FILE_TYPE
            | AUDIO_FILE_UNSUPPORTED_DATA_FORMAT
            | AUDIO_FILE_INVALID_FILE
            | AUDIO_FILE_PERMISSIONS
            | AUDIO_FILE_NOT_FOUND
    )
}

pub fn is_format_error(status: StatusCode) -> bool {
    matches!(
        status,
        AUDIO_FORMAT_UNSUPPORTED_PROPERTY
            | AUDIO_FORMAT_UNSUPPORTED_DATA_FORMAT
            | AUDIO_FORMAT_UNKNOWN_FORMAT
    )
}

pub fn is_property_error(status: StatusCode) -> bool {
    matches!(
        status,
        AUDIO_UNIT_INVALID_PROPERTY
            | AUDIO_UNIT_INVALID_PROPERTY_VALUE
            | AUDIO_UNIT_PROPERTY_NOT_WRITABLE
            | AUDIO_UNIT_PROPERTY_NOT_IN_USE
    )
}

/// 能力层用来表示“属性未知”的状态码
pub fn is_unknown_property(status: StatusCode) -> bool {
    matches!(
        status,
        AUDIO_FILE_UNSUPPORTED_PROPERTY
            | AUDIO_FORMAT_UNSUPPORTED_PROPERTY
            | AUDIO_UNIT_INVALID_PROPERTY
    )
}

/// 分类，'fmt?' 同时属于 File 和 Format 时优先 File
pub fn category(status: StatusCode) -> Option<ErrorCategory> {
    if is_file_error(status) {
        Some(ErrorCategory::File)
    } else if is_format_error(status) {
        Some(ErrorCategory::Format)
    } else if is_property_error(status) {
        Some(ErrorCategory::Property)
    } else {
        None
    }
}
