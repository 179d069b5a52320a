//! 内存属性源
//!
//! 行为与 AudioToolbox 的属性 API 一致：
//! - 未知属性返回 'pty?'
//! - 目标缓冲区小于数据时返回 '!siz'
//!
//! 可以注入失败、记录调用次数，主要用作测试替身。

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::value::{plain_bytes, PlainValue};
use super::{PropertyInfo, PropertySource};
use crate::status::{known, PropertyId, StatusCode};

#[derive(Debug, Clone)]
struct Entry {
    data: Vec<u8>,
    writable: bool,
    /// 覆盖探测时报告的大小
    reported_size: Option<u32>,
    info_failure: Option<StatusCode>,
    fetch_failure: Option<StatusCode>,
}

/// 内存中的属性集合
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: BTreeMap<PropertyId, Entry>,
    invalid: bool,
    info_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, id: PropertyId, data: Vec<u8>, writable: bool) -> Self {
        self.insert(id, data, writable);
        self
    }

    pub fn with_string(self, id: PropertyId, value: &str, writable: bool) -> Self {
        self.with_property(id, value.as_bytes().to_vec(), writable)
    }

    pub fn with_value<T: PlainValue>(self, id: PropertyId, value: &T, writable: bool) -> Self {
        self.with_property(id, plain_bytes(value), writable)
    }

    pub fn with_json(self, id: PropertyId, value: &serde_json::Value, writable: bool) -> Self {
        self.with_property(id, value.to_string().into_bytes(), writable)
    }

    /// 句柄失效（对应空句柄）
    pub fn invalidated(mut self) -> Self {
        self.invalid = true;
        self
    }

    /// 探测时报告的大小与实际数据不同
    pub fn reporting_size(mut self, id: PropertyId, size: u32) -> Self {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.reported_size = Some(size);
        }
        self
    }

    /// 探测该属性时返回指定状态
    pub fn failing_info(mut self, id: PropertyId, status: StatusCode) -> Self {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.info_failure = Some(status);
        }
        self
    }

    /// 读取该属性时返回指定状态（探测仍然成功）
    pub fn failing_fetch(mut self, id: PropertyId, status: StatusCode) -> Self {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.fetch_failure = Some(status);
        }
        self
    }

    pub fn insert(&mut self, id: PropertyId, data: Vec<u8>, writable: bool) {
        self.entries.insert(
            id,
            Entry {
                data,
                writable,
                reported_size: None,
                info_failure: None,
                fetch_failure: None,
            },
        );
    }

    pub fn remove(&mut self, id: PropertyId) -> Option<Vec<u8>> {
        self.entries.remove(&id).map(|entry| entry.data)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `property_info` 被调用的次数
    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::Relaxed)
    }

    /// `property_data` 被调用的次数
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::Relaxed)
    }
}

impl PropertySource for MemorySource {
    fn is_valid(&self) -> bool {
        !self.invalid
    }

    fn property_info(&self, id: PropertyId) -> Result<PropertyInfo, StatusCode> {
        self.info_calls.fetch_add(1, Ordering::Relaxed);

        let entry = self
            .entries
            .get(&id)
            .ok_or(known::AUDIO_FILE_UNSUPPORTED_PROPERTY)?;

        if let Some(status) = entry.info_failure {
            return Err(status);
        }

        Ok(PropertyInfo {
            size: entry.reported_size.unwrap_or(entry.data.len() as u32),
            writable: entry.writable,
        })
    }

    fn property_data(&self, id: PropertyId, data: &mut [u8]) -> Result<usize, StatusCode> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);

        let entry = self
            .entries
            .get(&id)
            .ok_or(known::AUDIO_FILE_UNSUPPORTED_PROPERTY)?;

        if let Some(status) = entry.fetch_failure {
            return Err(status);
        }

        if data.len() < entry.data.len() {
            return Err(known::AUDIO_FILE_BAD_PROPERTY_SIZE);
        }

        data[..entry.data.len()].copy_from_slice(&entry.data);
        Ok(entry.data.len())
    }
}
