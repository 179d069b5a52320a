//! 属性缓冲区
//!
//! RAII 风格：一次属性读取得到的字节由 `PropertyBuffer` 独占，
//! 离开作用域时自动释放。要么得到完整填充的缓冲区，要么什么都不返回。

use std::ops::Deref;

use super::accessor::fetch_bytes;
use super::PropertySource;
use crate::error::Result;
use crate::status::PropertyId;

/// 一次属性读取的结果
///
/// 不能比来源句柄活得更久：句柄销毁后缓冲区内容（例如其中的对象引用）
/// 不再有意义，由调用方保证顺序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyBuffer {
    id: PropertyId,
    data: Box<[u8]>,
}

impl PropertyBuffer {
    /// 探测大小 → 分配 → 读取
    ///
    /// 属性大小为 0 或读取没有写入任何字节时返回 `Ok(None)`；
    /// 失败时已分配的内存随错误一起释放。
    #[track_caller]
    pub fn create<S>(source: &S, id: PropertyId) -> Result<Option<Self>>
    where
        S: PropertySource + ?Sized,
    {
        let buffer = fetch_bytes(source, id, None)?.map(|data| Self {
            id,
            data: data.into_boxed_slice(),
        });

        if let Some(buffer) = &buffer {
            log::debug!("Property buffer {} created: {} bytes", id, buffer.size());
        }
        Ok(buffer)
    }

    /// 来源属性
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// 实际写入的字节数
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data.into_vec()
    }

    /// 显式释放（等价于 drop）
    pub fn release(self) {
        log::trace!("Property buffer {} released", self.id);
    }
}

impl Deref for PropertyBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for PropertyBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// 释放槽位中的缓冲区
///
/// 对空槽位或已经释放过的槽位是空操作。
pub fn release(slot: &mut Option<PropertyBuffer>) {
    if let Some(buffer) = slot.take() {
        buffer.release();
    }
}
