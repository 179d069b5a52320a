//! 安全属性访问
//!
//! 两阶段协议：先查询大小（probe），再分配、读取（fetch）。
//!
//! 读取前必须确认属性受支持：外部 API 对未知属性的读取行为未定义，
//! 所以 `get_property` 总是先做一次静默探测。
//!
//! 外部调用失败时经诊断报告器输出一行，然后把错误返回给调用方。

use log::{debug, trace};

use super::value::{DictionaryValue, FromPropertyData, NumberValue, StringValue};
use super::{PropertyInfo, PropertySource};
use crate::diag;
use crate::error::{CoreAudioError, Result};
use crate::status::{known, PropertyId, StatusCode};

const OP_GET_PROPERTY_INFO: &str = "GetPropertyInfo";
const OP_GET_PROPERTY: &str = "GetProperty";

/// 外部状态码 → 错误
fn map_info_status(id: PropertyId, status: StatusCode) -> CoreAudioError {
    if known::is_unknown_property(status) {
        CoreAudioError::UnsupportedProperty(id)
    } else {
        CoreAudioError::from_status(status, OP_GET_PROPERTY_INFO)
    }
}

/// 查询属性元数据（大小、是否可写），不传输数据
#[track_caller]
pub fn get_property_info<S>(source: &S, id: PropertyId) -> Result<PropertyInfo>
where
    S: PropertySource + ?Sized,
{
    if !source.is_valid() {
        return Err(CoreAudioError::InvalidHandle);
    }

    match source.property_info(id) {
        Ok(info) => {
            trace!("Property {} info: {} bytes, writable={}", id, info.size, info.writable);
            Ok(info)
        }
        Err(status) => {
            diag::check(status, OP_GET_PROPERTY_INFO);
            Err(map_info_status(id, status))
        }
    }
}

/// 读取属性到调用方提供的缓冲区，返回写入的字节数
///
/// `buffer` 的长度就是容量。读取前先确认属性受支持。
#[track_caller]
pub fn get_property<S>(source: &S, id: PropertyId, buffer: &mut [u8]) -> Result<usize>
where
    S: PropertySource + ?Sized,
{
    if !source.is_valid() {
        return Err(CoreAudioError::InvalidHandle);
    }

    if buffer.is_empty() {
        return Err(CoreAudioError::InvalidInput(format!(
            "empty destination buffer for property {}",
            id
        )));
    }

    if !is_property_supported(source, id) {
        debug!("Property {} not supported, skipping fetch", id);
        return Err(CoreAudioError::UnsupportedProperty(id));
    }

    match source.property_data(id, buffer) {
        Ok(written) => {
            trace!("Property {} fetched: {} bytes", id, written);
            Ok(written.min(buffer.len()))
        }
        Err(status) => {
            diag::check(status, OP_GET_PROPERTY);
            Err(CoreAudioError::from_status(status, OP_GET_PROPERTY))
        }
    }
}

/// 探测大小 → 分配 → 读取
///
/// 探测大小为 0 时返回 `None`，不分配；读取后没有数据同样返回 `None`。
#[track_caller]
pub(crate) fn fetch_bytes<S>(
    source: &S,
    id: PropertyId,
    expected_size: Option<usize>,
) -> Result<Option<Vec<u8>>>
where
    S: PropertySource + ?Sized,
{
    let info = get_property_info(source, id)?;
    if info.size == 0 {
        debug!("Property {} is empty", id);
        return Ok(None);
    }

    let size = info.size as usize;
    if let Some(expected) = expected_size {
        if expected != size {
            return Err(CoreAudioError::SizeMismatch {
                id,
                expected,
                actual: size,
            });
        }
    }

    let mut data = vec![0u8; size];
    let written = get_property(source, id, &mut data)?;
    data.truncate(written);
    if data.is_empty() {
        debug!("Property {} fetched no data", id);
        return Ok(None);
    }
    Ok(Some(data))
}

#[track_caller]
fn fetch_typed<S, T>(source: &S, id: PropertyId) -> Result<Option<T>>
where
    S: PropertySource + ?Sized,
    T: FromPropertyData,
{
    match fetch_bytes(source, id, T::expected_size())? {
        Some(data) => T::from_property_data(id, &data).map(Some),
        None => Ok(None),
    }
}

/// 读取任意可解释的属性值
#[track_caller]
pub fn get_value_property<S, T>(source: &S, id: PropertyId) -> Result<Option<T>>
where
    S: PropertySource + ?Sized,
    T: FromPropertyData,
{
    fetch_typed(source, id)
}

/// 读取字符串属性；属性为空时返回 `None`
#[track_caller]
pub fn get_string_property<S, T>(source: &S, id: PropertyId) -> Result<Option<T>>
where
    S: PropertySource + ?Sized,
    T: StringValue,
{
    fetch_typed(source, id)
}

/// 读取数值属性；属性为空时返回 `None`
#[track_caller]
pub fn get_number_property<S, T>(source: &S, id: PropertyId) -> Result<Option<T>>
where
    S: PropertySource + ?Sized,
    T: NumberValue,
{
    fetch_typed(source, id)
}

/// 读取字典属性；属性为空时返回 `None`
#[track_caller]
pub fn get_dictionary_property<S, T>(source: &S, id: PropertyId) -> Result<Option<T>>
where
    S: PropertySource + ?Sized,
    T: DictionaryValue,
{
    fetch_typed(source, id)
}

/// 属性是否受支持（任何错误都视为不支持，不报告）
pub fn is_property_supported<S>(source: &S, id: PropertyId) -> bool
where
    S: PropertySource + ?Sized,
{
    source.is_valid() && source.property_info(id).is_ok()
}

/// 属性是否可写（任何错误都视为不可写，不报告）
pub fn is_property_writable<S>(source: &S, id: PropertyId) -> bool
where
    S: PropertySource + ?Sized,
{
    source.is_valid()
        && source
            .property_info(id)
            .map(|info| info.writable)
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::diag::test_support::{guard, record_reports};
    use crate::property::MemorySource;

    const FMT: PropertyId = PropertyId::from_bytes(*b"fmt ");
    const NAME: PropertyId = PropertyId::from_bytes(*b"name");
    const RATE: PropertyId = PropertyId::from_bytes(*b"rate");
    const INFO: PropertyId = PropertyId::from_bytes(*b"info");
    const EMPTY: PropertyId = PropertyId::from_bytes(*b"empt");
    const UNKNOWN: PropertyId = PropertyId::from_bytes(*b"nope");

    fn source() -> MemorySource {
        MemorySource::new()
            .with_property(FMT, vec![0u8; 8], false)
            .with_string(NAME, "Track 01", true)
            .with_value(RATE, &44100.0f64, false)
            .with_property(INFO, br#"{"artist":"Someone"}"#.to_vec(), false)
            .with_property(EMPTY, Vec::new(), false)
    }

    #[test]
    fn test_fmt_end_to_end() {
        let src = source();

        let info = get_property_info(&src, FMT).unwrap();
        assert_eq!(info, PropertyInfo { size: 8, writable: false });

        let mut buffer = [0u8; 8];
        let written = get_property(&src, FMT, &mut buffer).unwrap();
        assert_eq!(written, 8);
        assert_eq!(get_property_info(&src, FMT).unwrap().size, 8);
    }

    #[test]
    fn test_unknown_property_never_fetches() {
        let src = source();

        let err = get_property_info(&src, UNKNOWN).unwrap_err();
        assert_eq!(err, CoreAudioError::UnsupportedProperty(UNKNOWN));

        let mut buffer = [0u8; 4];
        let err = get_property(&src, UNKNOWN, &mut buffer).unwrap_err();
        assert_eq!(err, CoreAudioError::UnsupportedProperty(UNKNOWN));
        assert_eq!(src.fetch_calls(), 0);
    }

    #[test]
    fn test_invalid_handle() {
        let src = source().invalidated();

        assert_eq!(get_property_info(&src, FMT).unwrap_err(), CoreAudioError::InvalidHandle);
        let mut buffer = [0u8; 8];
        assert_eq!(
            get_property(&src, FMT, &mut buffer).unwrap_err(),
            CoreAudioError::InvalidHandle
        );
        assert_eq!(src.info_calls(), 0);
        assert!(!is_property_supported(&src, FMT));
    }

    #[test]
    fn test_empty_destination_rejected() {
        let src = source();
        let err = get_property(&src, FMT, &mut []).unwrap_err();
        assert!(matches!(err, CoreAudioError::InvalidInput(_)));
        assert_eq!(src.fetch_calls(), 0);
    }

    #[test]
    fn test_fetch_failure_reported_and_returned() {
        let _guard = guard();
        let calls = record_reports();

        let status = StatusCode::from_bytes(*b"wht?");
        let src = source().failing_fetch(FMT, status);

        let mut buffer = [0u8; 8];
        let err = get_property(&src, FMT, &mut buffer).unwrap_err();
        assert_eq!(err, CoreAudioError::from_status(status, OP_GET_PROPERTY));

        let recorded = calls.lock().unwrap().clone();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, status);
        assert_eq!(recorded[0].1, OP_GET_PROPERTY);
        assert_eq!(recorded[0].2, file!());

        diag::reset_handler();
    }

    #[test]
    fn test_info_failure_reported() {
        let _guard = guard();
        let calls = record_reports();

        let src = source();
        let _ = get_property_info(&src, UNKNOWN);

        let recorded = calls.lock().unwrap().clone();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, known::AUDIO_FILE_UNSUPPORTED_PROPERTY);
        assert_eq!(recorded[0].1, OP_GET_PROPERTY_INFO);

        diag::reset_handler();
    }

    #[test]
    fn test_advisory_checks_are_silent() {
        let _guard = guard();
        let calls = record_reports();

        let src = source();
        assert!(is_property_supported(&src, FMT));
        assert!(!is_property_supported(&src, UNKNOWN));
        assert!(is_property_writable(&src, NAME));
        assert!(!is_property_writable(&src, FMT));
        assert!(!is_property_writable(&src, UNKNOWN));
        assert!(calls.lock().unwrap().is_empty());

        diag::reset_handler();
    }

    #[test]
    fn test_typed_getters() {
        let src = source();

        let name: Option<String> = get_string_property(&src, NAME).unwrap();
        assert_eq!(name.as_deref(), Some("Track 01"));

        let rate: Option<f64> = get_number_property(&src, RATE).unwrap();
        assert_eq!(rate, Some(44100.0));

        let info: Option<BTreeMap<String, String>> = get_dictionary_property(&src, INFO).unwrap();
        assert_eq!(info.unwrap()["artist"], "Someone");
    }

    #[test]
    fn test_zero_size_is_absent() {
        let src = source();

        let name: Option<String> = get_string_property(&src, EMPTY).unwrap();
        assert!(name.is_none());
        let number: Option<u32> = get_number_property(&src, EMPTY).unwrap();
        assert!(number.is_none());
        let dict: Option<BTreeMap<String, String>> = get_dictionary_property(&src, EMPTY).unwrap();
        assert!(dict.is_none());

        assert_eq!(src.fetch_calls(), 0);
    }

    #[test]
    fn test_empty_fetch_is_absent() {
        // 探测报告 8 字节，读取时一个字节都没写
        let src = MemorySource::new()
            .with_property(NAME, Vec::new(), false)
            .reporting_size(NAME, 8);

        let name: Option<String> = get_string_property(&src, NAME).unwrap();
        assert!(name.is_none());
        let raw: Option<Vec<u8>> = get_value_property(&src, NAME).unwrap();
        assert!(raw.is_none());
        assert_eq!(src.fetch_calls(), 2);
    }

    #[test]
    fn test_number_size_mismatch_checked_before_fetch() {
        let src = source();

        let err = get_number_property::<_, u32>(&src, RATE).unwrap_err();
        assert_eq!(
            err,
            CoreAudioError::SizeMismatch {
                id: RATE,
                expected: 4,
                actual: 8
            }
        );
        assert_eq!(src.fetch_calls(), 0);
    }

    #[test]
    fn test_typed_getter_propagates_errors() {
        let src = source();
        let err = get_string_property::<_, String>(&src, UNKNOWN).unwrap_err();
        assert_eq!(err, CoreAudioError::UnsupportedProperty(UNKNOWN));

        let src = source().failing_fetch(NAME, StatusCode(-50));
        let err = get_string_property::<_, String>(&src, NAME).unwrap_err();
        assert_eq!(err.status(), StatusCode(-50));
    }

    #[test]
    fn test_underlying_info_failure_not_mapped_to_unsupported() {
        let src = source().failing_info(FMT, StatusCode(-50));
        let err = get_property_info(&src, FMT).unwrap_err();
        assert_eq!(err, CoreAudioError::from_status(StatusCode(-50), OP_GET_PROPERTY_INFO));
    }

    #[test]
    fn test_raw_value_property() {
        let src = source();
        let raw: Option<Vec<u8>> = get_value_property(&src, FMT).unwrap();
        assert_eq!(raw, Some(vec![0u8; 8]));
    }
}
