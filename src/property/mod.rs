//! 属性访问
//!
//! 包含：
//! - PropertySource: 外部不透明句柄的能力接口（查询大小 / 读取数据）
//! - Accessor: 先探测再读取的安全访问函数、类型化 getter
//! - Value: 属性字节到具体类型的转换
//! - Buffer: 作用域内自动释放的属性缓冲区
//! - Memory: 内存中的属性源（测试替身）
//! - AudioFile: macOS AudioFileID 封装

pub mod accessor;
#[cfg(target_os = "macos")]
pub mod audio_file;
pub mod buffer;
pub mod ids;
pub mod memory;
pub mod value;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::status::{PropertyId, StatusCode};

pub use accessor::{
    get_dictionary_property, get_number_property, get_property, get_property_info,
    get_string_property, get_value_property, is_property_supported, is_property_writable,
};
#[cfg(target_os = "macos")]
pub use audio_file::AudioFile;
pub use buffer::{release, PropertyBuffer};
pub use memory::MemorySource;
pub use value::{DictionaryValue, FromPropertyData, NumberValue, PlainValue, StringValue};

/// 属性元数据
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PropertyInfo {
    /// 数据字节数
    pub size: u32,
    pub writable: bool,
}

/// 外部句柄的属性能力
///
/// 对应 `XxxGetPropertyInfo` / `XxxGetProperty` 这一对 C API。
/// 返回的 `StatusCode` 是原始的非零状态；成功用 `Ok` 表示。
///
/// 实现方假定是同步的，同一句柄可重入。
pub trait PropertySource {
    /// 句柄是否有效（对应 C 侧的空指针检查）
    fn is_valid(&self) -> bool {
        true
    }

    /// 只查询元数据，不传输数据
    fn property_info(&self, id: PropertyId) -> std::result::Result<PropertyInfo, StatusCode>;

    /// 把属性数据写入 `data`，返回实际写入的字节数
    fn property_data(
        &self,
        id: PropertyId,
        data: &mut [u8],
    ) -> std::result::Result<usize, StatusCode>;
}

impl<T: PropertySource + ?Sized> PropertySource for &T {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn property_info(&self, id: PropertyId) -> std::result::Result<PropertyInfo, StatusCode> {
        (**self).property_info(id)
    }

    fn property_data(
        &self,
        id: PropertyId,
        data: &mut [u8],
    ) -> std::result::Result<usize, StatusCode> {
        (**self).property_data(id, data)
    }
}

/// 属性源上的便捷方法
pub trait PropertySourceExt: PropertySource {
    #[track_caller]
    fn info(&self, id: PropertyId) -> Result<PropertyInfo> {
        get_property_info(self, id)
    }

    #[track_caller]
    fn string_property<T: StringValue>(&self, id: PropertyId) -> Result<Option<T>> {
        get_string_property(self, id)
    }

    #[track_caller]
    fn number_property<T: NumberValue>(&self, id: PropertyId) -> Result<Option<T>> {
        get_number_property(self, id)
    }

    #[track_caller]
    fn dictionary_property<T: DictionaryValue>(&self, id: PropertyId) -> Result<Option<T>> {
        get_dictionary_property(self, id)
    }

    #[track_caller]
    fn value_property<T: FromPropertyData>(&self, id: PropertyId) -> Result<Option<T>> {
        get_value_property(self, id)
    }

    #[track_caller]
    fn buffer(&self, id: PropertyId) -> Result<Option<PropertyBuffer>> {
        PropertyBuffer::create(self, id)
    }

    fn supports(&self, id: PropertyId) -> bool {
        is_property_supported(self, id)
    }

    fn is_writable(&self, id: PropertyId) -> bool {
        is_property_writable(self, id)
    }

    /// 依次探测一组属性，返回受支持者的元数据
    fn supported_properties(&self, ids: &[PropertyId]) -> BTreeMap<PropertyId, PropertyInfo> {
        if !self.is_valid() {
            return BTreeMap::new();
        }
        ids.iter()
            .filter_map(|&id| self.property_info(id).ok().map(|info| (id, info)))
            .collect()
    }
}

impl<T: PropertySource + ?Sized> PropertySourceExt for T {}
