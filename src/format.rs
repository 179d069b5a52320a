//! 音频流格式描述
//!
//! `AudioStreamBasicDescription` 的 Rust 表示，布局与 CoreAudioTypes.h 一致，
//! 可以直接作为 'dfmt' 属性读取。

use std::fmt;

use crate::error::Result;
use crate::property::value::{read_plain, FromPropertyData, PlainValue};
use crate::status::{codec, PropertyId};

pub const K_AUDIO_FORMAT_LINEAR_PCM: u32 = 0x6C70636D; // 'lpcm'
pub const K_AUDIO_FORMAT_MPEG4_AAC: u32 = 0x61616320; // 'aac '
pub const K_AUDIO_FORMAT_MPEG_LAYER3: u32 = 0x2E6D7033; // '.mp3'
pub const K_AUDIO_FORMAT_FLAC: u32 = 0x666C6163; // 'flac'
pub const K_AUDIO_FORMAT_APPLE_LOSSLESS: u32 = 0x616C6163; // 'alac'

pub const K_AUDIO_FORMAT_FLAG_IS_FLOAT: u32 = 1 << 0;
pub const K_AUDIO_FORMAT_FLAG_IS_BIG_ENDIAN: u32 = 1 << 1;
pub const K_AUDIO_FORMAT_FLAG_IS_SIGNED_INTEGER: u32 = 1 << 2;
pub const K_AUDIO_FORMAT_FLAG_IS_PACKED: u32 = 1 << 3;
pub const K_AUDIO_FORMAT_FLAG_IS_NON_INTERLEAVED: u32 = 1 << 5;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioStreamBasicDescription {
    pub sample_rate: f64,
    pub format_id: u32,
    pub format_flags: u32,
    pub bytes_per_packet: u32,
    pub frames_per_packet: u32,
    pub bytes_per_frame: u32,
    pub channels_per_frame: u32,
    pub bits_per_channel: u32,
    pub reserved: u32,
}

// SAFETY: repr(C)，f64 + 8 个 u32 共 40 字节，无填充，任意位模式合法
unsafe impl PlainValue for AudioStreamBasicDescription {}

impl FromPropertyData for AudioStreamBasicDescription {
    fn expected_size() -> Option<usize> {
        Some(std::mem::size_of::<Self>())
    }

    fn from_property_data(id: PropertyId, data: &[u8]) -> Result<Self> {
        read_plain(id, data)
    }
}

impl AudioStreamBasicDescription {
    /// 有符号整数、packed、交织的 PCM
    pub fn standard_pcm(sample_rate: f64, channels: u32, bits_per_channel: u32) -> Self {
        let bytes_per_sample = bits_per_channel / 8;
        Self {
            sample_rate,
            format_id: K_AUDIO_FORMAT_LINEAR_PCM,
            format_flags: K_AUDIO_FORMAT_FLAG_IS_SIGNED_INTEGER | K_AUDIO_FORMAT_FLAG_IS_PACKED,
            bytes_per_packet: bytes_per_sample * channels,
            frames_per_packet: 1,
            bytes_per_frame: bytes_per_sample * channels,
            channels_per_frame: channels,
            bits_per_channel,
            reserved: 0,
        }
    }

    /// 32-bit float、packed、交织的 PCM
    pub fn standard_float(sample_rate: f64, channels: u32) -> Self {
        Self {
            sample_rate,
            format_id: K_AUDIO_FORMAT_LINEAR_PCM,
            format_flags: K_AUDIO_FORMAT_FLAG_IS_FLOAT | K_AUDIO_FORMAT_FLAG_IS_PACKED,
            bytes_per_packet: 4 * channels,
            frames_per_packet: 1,
            bytes_per_frame: 4 * channels,
            channels_per_frame: channels,
            bits_per_channel: 32,
            reserved: 0,
        }
    }

    #[inline]
    pub fn is_pcm(&self) -> bool {
        self.format_id == K_AUDIO_FORMAT_LINEAR_PCM
    }

    #[inline]
    pub fn is_interleaved(&self) -> bool {
        (self.format_flags & K_AUDIO_FORMAT_FLAG_IS_NON_INTERLEAVED) == 0
    }

    #[inline]
    pub fn is_float(&self) -> bool {
        (self.format_flags & K_AUDIO_FORMAT_FLAG_IS_FLOAT) != 0
    }

    /// 每样本字节数，只对 PCM 有意义
    pub fn bytes_per_sample(&self) -> Option<u32> {
        self.is_pcm().then_some(self.bits_per_channel / 8)
    }

    /// 格式 ID 的 FourCC 文本
    pub fn format_name(&self) -> String {
        codec::decode(self.format_id as i32)
    }

    /// 多行可读描述
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AudioStreamBasicDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Audio Format Description:")?;
        writeln!(f, "  Format ID: {}", self.format_name())?;
        writeln!(f, "  Sample Rate: {} Hz", self.sample_rate)?;
        writeln!(f, "  Format Flags: 0x{:X}", self.format_flags)?;
        writeln!(f, "  Bytes Per Packet: {}", self.bytes_per_packet)?;
        writeln!(f, "  Frames Per Packet: {}", self.frames_per_packet)?;
        writeln!(f, "  Bytes Per Frame: {}", self.bytes_per_frame)?;
        writeln!(f, "  Channels Per Frame: {}", self.channels_per_frame)?;
        write!(f, "  Bits Per Channel: {}", self.bits_per_channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::value::plain_bytes;

    #[test]
    fn test_layout_size() {
        assert_eq!(std::mem::size_of::<AudioStreamBasicDescription>(), 40);
    }

    #[test]
    fn test_standard_pcm() {
        let asbd = AudioStreamBasicDescription::standard_pcm(44100.0, 2, 16);
        assert!(asbd.is_pcm());
        assert!(asbd.is_interleaved());
        assert!(!asbd.is_float());
        assert_eq!(asbd.bytes_per_frame, 4);
        assert_eq!(asbd.bytes_per_packet, 4);
        assert_eq!(asbd.bytes_per_sample(), Some(2));
    }

    #[test]
    fn test_standard_float() {
        let asbd = AudioStreamBasicDescription::standard_float(48000.0, 2);
        assert!(asbd.is_float());
        assert_eq!(asbd.bytes_per_frame, 8);
        assert_eq!(asbd.bits_per_channel, 32);
    }

    #[test]
    fn test_non_pcm() {
        let asbd = AudioStreamBasicDescription {
            format_id: K_AUDIO_FORMAT_MPEG4_AAC,
            format_flags: K_AUDIO_FORMAT_FLAG_IS_NON_INTERLEAVED,
            ..Default::default()
        };
        assert!(!asbd.is_pcm());
        assert!(!asbd.is_interleaved());
        assert_eq!(asbd.bytes_per_sample(), None);
        assert_eq!(asbd.format_name(), "'aac '");
    }

    #[test]
    fn test_description() {
        let asbd = AudioStreamBasicDescription::standard_pcm(44100.0, 2, 24);
        let text = asbd.description();
        assert!(text.starts_with("Audio Format Description:"));
        assert!(text.contains("Format ID: 'lpcm'"));
        assert!(text.contains("Sample Rate: 44100 Hz"));
        assert!(text.contains("Format Flags: 0xC"));
        assert!(text.contains("Bits Per Channel: 24"));
    }

    #[test]
    fn test_from_property_bytes() {
        let asbd = AudioStreamBasicDescription::standard_float(96000.0, 1);
        let bytes = plain_bytes(&asbd);
        let id = PropertyId::from_bytes(*b"dfmt");
        assert_eq!(
            AudioStreamBasicDescription::from_property_data(id, &bytes).unwrap(),
            asbd
        );
        assert!(AudioStreamBasicDescription::from_property_data(id, &bytes[..8]).is_err());
    }
}
