//! 属性数据的类型化解释
//!
//! 属性数据在外部 API 中是类型擦除的字节块，这里把字节转换成具体类型：
//! - 字符串：UTF-8（去掉末尾的 NUL），macOS 上还支持 `CFString`
//! - 数值：原生字节序的定长整数 / 浮点，macOS 上还支持 `CFNumber`
//! - 字典：JSON 对象，macOS 上还支持 `CFDictionary`

use std::collections::BTreeMap;
use std::mem;

use crate::error::{CoreAudioError, Result};
use crate::status::PropertyId;

/// 从属性字节构造值
pub trait FromPropertyData: Sized {
    /// 定长类型返回 `Some(size)`，读取前会先与探测到的大小比对
    fn expected_size() -> Option<usize> {
        None
    }

    fn from_property_data(id: PropertyId, data: &[u8]) -> Result<Self>;
}

/// 可作为字符串属性读取的类型
pub trait StringValue: FromPropertyData {}

/// 可作为数值属性读取的类型
pub trait NumberValue: FromPropertyData {}

/// 可作为字典属性读取的类型
pub trait DictionaryValue: FromPropertyData {}

/// 可以按字节直接复制的 `repr(C)` 值
///
/// # Safety
///
/// 实现类型必须是 `Copy`、没有填充字节，并且任意位模式都是合法值。
pub unsafe trait PlainValue: Copy + 'static {}

/// 按字节读取一个定长值（不要求对齐）
pub fn read_plain<T: PlainValue>(id: PropertyId, data: &[u8]) -> Result<T> {
    let expected = mem::size_of::<T>();
    if data.len() != expected {
        return Err(CoreAudioError::SizeMismatch {
            id,
            expected,
            actual: data.len(),
        });
    }
    // SAFETY: 长度已校验，PlainValue 保证任意位模式合法
    Ok(unsafe { std::ptr::read_unaligned(data.as_ptr() as *const T) })
}

/// 定长值的原始字节
pub fn plain_bytes<T: PlainValue>(value: &T) -> Vec<u8> {
    // SAFETY: PlainValue 没有填充字节，整个对象都是已初始化内存
    unsafe {
        std::slice::from_raw_parts(value as *const T as *const u8, mem::size_of::<T>()).to_vec()
    }
}

macro_rules! impl_number {
    ($($ty:ty),* $(,)?) => {
        $(
            unsafe impl PlainValue for $ty {}

            impl FromPropertyData for $ty {
                fn expected_size() -> Option<usize> {
                    Some(mem::size_of::<$ty>())
                }

                fn from_property_data(id: PropertyId, data: &[u8]) -> Result<Self> {
                    read_plain(id, data)
                }
            }

            impl NumberValue for $ty {}
        )*
    };
}

impl_number!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

fn trim_nul(data: &[u8]) -> &[u8] {
    let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &data[..end]
}

/// 原始字节
impl FromPropertyData for Vec<u8> {
    fn from_property_data(_id: PropertyId, data: &[u8]) -> Result<Self> {
        Ok(data.to_vec())
    }
}

impl FromPropertyData for String {
    fn from_property_data(id: PropertyId, data: &[u8]) -> Result<Self> {
        String::from_utf8(trim_nul(data).to_vec()).map_err(|e| CoreAudioError::InvalidData {
            id,
            reason: e.to_string(),
        })
    }
}

impl StringValue for String {}

impl FromPropertyData for BTreeMap<String, String> {
    fn from_property_data(id: PropertyId, data: &[u8]) -> Result<Self> {
        serde_json::from_slice(trim_nul(data)).map_err(|e| CoreAudioError::InvalidData {
            id,
            reason: e.to_string(),
        })
    }
}

impl DictionaryValue for BTreeMap<String, String> {}

impl FromPropertyData for serde_json::Map<String, serde_json::Value> {
    fn from_property_data(id: PropertyId, data: &[u8]) -> Result<Self> {
        serde_json::from_slice(trim_nul(data)).map_err(|e| CoreAudioError::InvalidData {
            id,
            reason: e.to_string(),
        })
    }
}

impl DictionaryValue for serde_json::Map<String, serde_json::Value> {}

/// Core Foundation 对象
///
/// AudioToolbox 把 CF 对象引用写进属性缓冲区，调用方负责释放（create rule）。
/// 包装后由 `Drop` 释放。
#[cfg(target_os = "macos")]
mod cf {
    use std::ffi::c_void;
    use std::mem;

    use core_foundation::base::TCFType;
    use core_foundation::dictionary::{CFDictionary, CFDictionaryRef};
    use core_foundation::number::{CFNumber, CFNumberRef};
    use core_foundation::string::{CFString, CFStringRef};

    use super::{DictionaryValue, FromPropertyData, NumberValue, StringValue};
    use crate::error::{CoreAudioError, Result};
    use crate::status::PropertyId;

    fn read_object_ref(id: PropertyId, data: &[u8]) -> Result<*const c_void> {
        let expected = mem::size_of::<*const c_void>();
        if data.len() != expected {
            return Err(CoreAudioError::SizeMismatch {
                id,
                expected,
                actual: data.len(),
            });
        }
        // SAFETY: 长度等于指针大小
        let ptr = unsafe { std::ptr::read_unaligned(data.as_ptr() as *const *const c_void) };
        if ptr.is_null() {
            return Err(CoreAudioError::InvalidData {
                id,
                reason: "null object reference".to_string(),
            });
        }
        Ok(ptr)
    }

    impl FromPropertyData for CFString {
        fn expected_size() -> Option<usize> {
            Some(mem::size_of::<*const c_void>())
        }

        fn from_property_data(id: PropertyId, data: &[u8]) -> Result<Self> {
            let ptr = read_object_ref(id, data)?;
            Ok(unsafe { Self::wrap_under_create_rule(ptr as CFStringRef) })
        }
    }

    impl StringValue for CFString {}

    impl FromPropertyData for CFNumber {
        fn expected_size() -> Option<usize> {
            Some(mem::size_of::<*const c_void>())
        }

        fn from_property_data(id: PropertyId, data: &[u8]) -> Result<Self> {
            let ptr = read_object_ref(id, data)?;
            Ok(unsafe { Self::wrap_under_create_rule(ptr as CFNumberRef) })
        }
    }

    impl NumberValue for CFNumber {}

    impl FromPropertyData for CFDictionary {
        fn expected_size() -> Option<usize> {
            Some(mem::size_of::<*const c_void>())
        }

        fn from_property_data(id: PropertyId, data: &[u8]) -> Result<Self> {
            let ptr = read_object_ref(id, data)?;
            Ok(unsafe { Self::wrap_under_create_rule(ptr as CFDictionaryRef) })
        }
    }

    impl DictionaryValue for CFDictionary {}
}
