//! 时间测量
//!
//! - Mach 时间：mach ticks 到纳秒的正确转换
//! - PerformanceTimer: 单调时钟上的开始 / 停止 / 经过时间

use std::sync::OnceLock;

#[cfg(target_os = "macos")]
mod mach {
    #[repr(C)]
    pub struct mach_timebase_info_t {
        pub numer: u32,
        pub denom: u32,
    }

    extern "C" {
        pub fn mach_absolute_time() -> u64;
        pub fn mach_timebase_info(info: *mut mach_timebase_info_t) -> i32;
    }
}

/// Mach timebase 信息（全局缓存，只初始化一次）
static TIMEBASE: OnceLock<TimebaseInfo> = OnceLock::new();

#[derive(Clone, Copy)]
struct TimebaseInfo {
    numer: u32,
    denom: u32,
}

impl TimebaseInfo {
    #[cfg(target_os = "macos")]
    fn get() -> Self {
        *TIMEBASE.get_or_init(|| {
            let mut info = mach::mach_timebase_info_t { numer: 0, denom: 0 };
            let status = unsafe { mach::mach_timebase_info(&mut info) };
            if status != 0 || info.numer == 0 || info.denom == 0 {
                log::warn!("mach_timebase_info failed ({}), assuming 1/1", status);
                return TimebaseInfo { numer: 1, denom: 1 };
            }
            TimebaseInfo {
                numer: info.numer,
                denom: info.denom,
            }
        })
    }

    /// 非 macOS 上 ticks 就是纳秒
    #[cfg(not(target_os = "macos"))]
    fn get() -> Self {
        *TIMEBASE.get_or_init(|| TimebaseInfo { numer: 1, denom: 1 })
    }
}

/// 将 mach ticks 转换为纳秒
///
/// Intel Mac 上 timebase 通常是 1/1，Apple Silicon 上通常是 125/3
#[inline]
pub fn mach_ticks_to_ns(ticks: u64) -> u64 {
    let info = TimebaseInfo::get();
    // 用 u128 做中间值，长时间间隔也不会溢出
    (ticks as u128 * info.numer as u128 / info.denom as u128) as u64
}

/// 将纳秒转换为 mach ticks
#[cfg(test)]
fn ns_to_mach_ticks(ns: u64) -> u64 {
    let info = TimebaseInfo::get();
    (ns as u128 * info.denom as u128 / info.numer as u128) as u64
}

/// 获取当前时间（mach ticks）
#[cfg(target_os = "macos")]
#[inline]
pub fn now_ticks() -> u64 {
    unsafe { mach::mach_absolute_time() }
}

/// 进程内单调时钟，起点为第一次调用
#[cfg(not(target_os = "macos"))]
#[inline]
pub fn now_ticks() -> u64 {
    use std::time::Instant;
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

/// 获取当前时间（纳秒）
#[inline]
pub fn now_ns() -> u64 {
    mach_ticks_to_ns(now_ticks())
}

/// 高精度计时器
///
/// 未启动时经过时间为 0；运行中读取得到到当前为止的时间。
#[derive(Clone, Copy, Debug, Default)]
pub struct PerformanceTimer {
    start_ns: u64,
    end_ns: u64,
    started: bool,
    running: bool,
}

impl PerformanceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始（重复调用会重新计时）
    pub fn start(&mut self) {
        self.start_ns = now_ns();
        self.end_ns = self.start_ns;
        self.started = true;
        self.running = true;
    }

    /// 停止；未运行时为空操作
    pub fn stop(&mut self) {
        if self.running {
            self.end_ns = now_ns();
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn elapsed_ns(&self) -> u64 {
        if !self.started {
            return 0;
        }
        let end = if self.running { now_ns() } else { self.end_ns };
        end.saturating_sub(self.start_ns)
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_ns() as f64 / 1e9
    }

    pub fn elapsed_milliseconds(&self) -> f64 {
        self.elapsed_seconds() * 1_000.0
    }

    pub fn elapsed_microseconds(&self) -> f64 {
        self.elapsed_seconds() * 1_000_000.0
    }
}

/// 测量闭包执行时间，返回（结果, 秒）
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let mut timer = PerformanceTimer::new();
    timer.start();
    let value = f();
    timer.stop();
    (value, timer.elapsed_seconds())
}
