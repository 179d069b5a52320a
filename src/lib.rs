//! Core Audio Foundation
//!
//! 外部句柄式媒体 API 与应用之间的诊断和属性访问层：
//! - FourCC 状态码编解码
//! - 可插拔的进程级错误报告
//! - 先探测大小再读取的安全属性访问

pub mod diag;
pub mod error;
pub mod format;
pub mod property;
pub mod status;
pub mod timing;

pub use error::{CoreAudioError, Result};
pub use property::{PropertyBuffer, PropertyInfo, PropertySource, PropertySourceExt};
pub use status::{PropertyId, StatusCode};
