//! AudioToolbox AudioFile 属性源
//!
//! 封装 `AudioFileID`：打开时获取句柄，Drop 时关闭。
//! 属性查询直接转发给 `AudioFileGetPropertyInfo` / `AudioFileGetProperty`。

use std::collections::BTreeMap;
use std::ffi::c_void;
use std::path::Path;
use std::ptr;

use core_foundation::base::{CFType, CFTypeRef, TCFType};
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;
use core_foundation::url::CFURL;
use coreaudio_sys::{
    AudioFileClose, AudioFileGetProperty, AudioFileGetPropertyInfo, AudioFileID,
    AudioFileOpenURL,
};

use super::{ids, PropertyInfo, PropertySource, PropertySourceExt};
use crate::diag;
use crate::error::{CoreAudioError, Result};
use crate::format::AudioStreamBasicDescription;
use crate::status::{PropertyId, StatusCode};

/// kAudioFileReadPermission
const K_AUDIO_FILE_READ_PERMISSION: i8 = 0x01;

const OP_OPEN: &str = "AudioFileOpenURL";

/// 已打开的音频文件
pub struct AudioFile {
    id: AudioFileID,
}

impl AudioFile {
    /// 以只读方式打开音频文件
    #[track_caller]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let url = CFURL::from_path(path, false).ok_or_else(|| {
            CoreAudioError::InvalidInput(format!("cannot build URL for {}", path.display()))
        })?;

        let mut id: AudioFileID = ptr::null_mut();
        let status = StatusCode(unsafe {
            AudioFileOpenURL(
                url.as_concrete_TypeRef() as _,
                K_AUDIO_FILE_READ_PERMISSION as _,
                0,
                &mut id,
            )
        });

        if !status.is_success() {
            diag::check(status, OP_OPEN);
            return Err(CoreAudioError::from_status(status, OP_OPEN));
        }

        if id.is_null() {
            return Err(CoreAudioError::InvalidHandle);
        }

        log::info!("Opened audio file: {}", path.display());
        Ok(Self { id })
    }

    /// 'dfmt' 数据格式
    #[track_caller]
    pub fn data_format(&self) -> Result<Option<AudioStreamBasicDescription>> {
        self.value_property(ids::DATA_FORMAT)
    }

    /// 'edur' 估计时长（秒）
    #[track_caller]
    pub fn estimated_duration(&self) -> Result<Option<f64>> {
        self.number_property(ids::ESTIMATED_DURATION)
    }

    /// 'info' 信息字典，非字符串值用 CF 的描述文本表示
    #[track_caller]
    pub fn info_dictionary(&self) -> Result<Option<BTreeMap<String, String>>> {
        let dict: Option<CFDictionary> = self.dictionary_property(ids::INFO_DICTIONARY)?;
        Ok(dict.map(|dict| cf_dictionary_to_strings(&dict)))
    }
}

impl PropertySource for AudioFile {
    fn is_valid(&self) -> bool {
        !self.id.is_null()
    }

    fn property_info(&self, id: PropertyId) -> std::result::Result<PropertyInfo, StatusCode> {
        let mut size: u32 = 0;
        let mut writable: u32 = 0;
        let status = unsafe { AudioFileGetPropertyInfo(self.id, id.0, &mut size, &mut writable) };
        if status != 0 {
            return Err(StatusCode(status));
        }
        Ok(PropertyInfo {
            size,
            writable: writable != 0,
        })
    }

    fn property_data(
        &self,
        id: PropertyId,
        data: &mut [u8],
    ) -> std::result::Result<usize, StatusCode> {
        let mut size = u32::try_from(data.len()).unwrap_or(u32::MAX);
        let status = unsafe {
            AudioFileGetProperty(self.id, id.0, &mut size, data.as_mut_ptr() as *mut c_void)
        };
        if status != 0 {
            return Err(StatusCode(status));
        }
        Ok(size as usize)
    }
}

impl Drop for AudioFile {
    fn drop(&mut self) {
        let status = StatusCode(unsafe { AudioFileClose(self.id) });
        if status.is_success() {
            log::debug!("Audio file closed");
        } else {
            log::warn!("AudioFileClose failed: {} ({})", status, status.0);
        }
    }
}

fn cf_describe(value: &CFType) -> String {
    match value.downcast::<CFString>() {
        Some(s) => s.to_string(),
        None => format!("{:?}", value),
    }
}

/// CFDictionary → 字符串映射
pub fn cf_dictionary_to_strings(dict: &CFDictionary) -> BTreeMap<String, String> {
    let (keys, values) = dict.get_keys_and_values();
    keys.into_iter()
        .zip(values)
        .map(|(key, value)| {
            // 字典持有这些对象，按 get rule 包装
            let key = unsafe { CFType::wrap_under_get_rule(key as CFTypeRef) };
            let value = unsafe { CFType::wrap_under_get_rule(value as CFTypeRef) };
            (cf_describe(&key), cf_describe(&value))
        })
        .collect()
}
