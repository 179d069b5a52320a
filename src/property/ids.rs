//! AudioFile 常用属性标识

use crate::status::PropertyId;

/// 'ffmt': AudioFileTypeID (u32)
pub const FILE_FORMAT: PropertyId = PropertyId::from_bytes(*b"ffmt");
/// 'dfmt': AudioStreamBasicDescription
pub const DATA_FORMAT: PropertyId = PropertyId::from_bytes(*b"dfmt");
/// 'flst': AudioFormatListItem 数组
pub const FORMAT_LIST: PropertyId = PropertyId::from_bytes(*b"flst");
/// 'optm': u32
pub const IS_OPTIMIZED: PropertyId = PropertyId::from_bytes(*b"optm");
/// 'mgic': 原始字节
pub const MAGIC_COOKIE_DATA: PropertyId = PropertyId::from_bytes(*b"mgic");
/// 'bcnt': u64
pub const AUDIO_DATA_BYTE_COUNT: PropertyId = PropertyId::from_bytes(*b"bcnt");
/// 'pcnt': u64
pub const AUDIO_DATA_PACKET_COUNT: PropertyId = PropertyId::from_bytes(*b"pcnt");
/// 'psze': u32
pub const MAXIMUM_PACKET_SIZE: PropertyId = PropertyId::from_bytes(*b"psze");
/// 'doff': i64
pub const DATA_OFFSET: PropertyId = PropertyId::from_bytes(*b"doff");
/// 'cmap': AudioChannelLayout（变长）
pub const CHANNEL_LAYOUT: PropertyId = PropertyId::from_bytes(*b"cmap");
/// 'info': CFDictionary
pub const INFO_DICTIONARY: PropertyId = PropertyId::from_bytes(*b"info");
/// 'edur': f64 秒
pub const ESTIMATED_DURATION: PropertyId = PropertyId::from_bytes(*b"edur");
/// 'brat': u32 bits/s
pub const BIT_RATE: PropertyId = PropertyId::from_bytes(*b"brat");
/// 'sbtd': i32
pub const SOURCE_BIT_DEPTH: PropertyId = PropertyId::from_bytes(*b"sbtd");
/// 'mkls': AudioFileMarkerList（变长）
pub const MARKER_LIST: PropertyId = PropertyId::from_bytes(*b"mkls");

/// `inspect` 命令探测的属性
pub const COMMON: &[PropertyId] = &[
    FILE_FORMAT,
    DATA_FORMAT,
    IS_OPTIMIZED,
    MAGIC_COOKIE_DATA,
    AUDIO_DATA_BYTE_COUNT,
    AUDIO_DATA_PACKET_COUNT,
    MAXIMUM_PACKET_SIZE,
    DATA_OFFSET,
    CHANNEL_LAYOUT,
    INFO_DICTIONARY,
    ESTIMATED_DURATION,
    BIT_RATE,
    SOURCE_BIT_DEPTH,
    MARKER_LIST,
];
