//! 诊断报告
//!
//! 进程级可插拔的错误处理器：
//! - Default: 格式化后写一行到 stderr
//! - Custom: 调用方通过 `install_handler` 安装
//!
//! 只用于诊断输出，不参与控制流。错误总是通过返回值交给调用方。
//!
//! 状态由 `RwLock` 保护，多线程同时 report / install / reset 没有数据竞争。
//! 处理器先从锁里克隆出来再调用，所以处理器内部可以重新安装或重置。

use std::borrow::Cow;
use std::io::Write;
use std::panic::Location;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::status::StatusCode;

/// 自定义处理器：(状态码, 操作名, 调用位置)
pub type DiagnosticHandler = Arc<dyn Fn(StatusCode, &str, &Location<'_>) + Send + Sync>;

/// 当前生效的处理器
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReporterMode {
    Default,
    Custom,
}

/// 默认处理器配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticConfig {
    /// 行首上下文标签
    pub context: Cow<'static, str>,
    /// 同时通过 `log::error!` 输出
    pub echo_to_log: bool,
}

impl DiagnosticConfig {
    const DEFAULT: DiagnosticConfig = DiagnosticConfig {
        context: Cow::Borrowed("Core Audio"),
        echo_to_log: false,
    };
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

struct ReporterState {
    handler: Option<DiagnosticHandler>,
    config: DiagnosticConfig,
}

static STATE: RwLock<ReporterState> = RwLock::new(ReporterState {
    handler: None,
    config: DiagnosticConfig::DEFAULT,
});

fn read_state() -> RwLockReadGuard<'static, ReporterState> {
    STATE.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_state() -> RwLockWriteGuard<'static, ReporterState> {
    STATE.write().unwrap_or_else(PoisonError::into_inner)
}

/// 安装自定义处理器，替换之前的处理器（不通知旧处理器）
pub fn install_handler<F>(handler: F)
where
    F: Fn(StatusCode, &str, &Location<'_>) + Send + Sync + 'static,
{
    write_state().handler = Some(Arc::new(handler));
    log::debug!("Custom diagnostic handler installed");
}

/// 恢复默认处理器
pub fn reset_handler() {
    write_state().handler = None;
    log::debug!("Diagnostic handler reset to default");
}

pub fn mode() -> ReporterMode {
    if read_state().handler.is_some() {
        ReporterMode::Custom
    } else {
        ReporterMode::Default
    }
}

/// 替换默认处理器的配置
pub fn configure(config: DiagnosticConfig) {
    write_state().config = config;
}

pub fn config() -> DiagnosticConfig {
    read_state().config.clone()
}

/// 报告一个状态码
///
/// 成功状态直接返回；否则交给当前处理器。
pub fn report(status: StatusCode, operation: &str, location: &Location<'_>) {
    if status.is_success() {
        return;
    }

    let custom = read_state().handler.clone();
    match custom {
        Some(handler) => handler(status, operation, location),
        None => default_handler(status, operation, location),
    }
}

/// 在调用处捕获源码位置后报告
#[track_caller]
pub fn check(status: StatusCode, operation: &str) {
    report(status, operation, Location::caller());
}

/// 默认处理器输出的单行文本
pub fn format_diagnostic(
    context: &str,
    status: StatusCode,
    operation: &str,
    location: &Location<'_>,
) -> String {
    format!(
        "{} Error in {}: {} ({}) at {}:{}",
        context,
        operation,
        status,
        status.0,
        location.file(),
        location.line()
    )
}

fn default_handler(status: StatusCode, operation: &str, location: &Location<'_>) {
    let config = config();
    let line = format_diagnostic(&config.context, status, operation, location);

    // 写失败直接忽略
    let _ = writeln!(std::io::stderr().lock(), "{}", line);

    if config.echo_to_log {
        log::error!("{}", line);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    /// (状态码, 操作名, 文件, 行号)
    pub(crate) type Recorded = Arc<Mutex<Vec<(StatusCode, String, String, u32)>>>;

    /// 修改全局处理器的测试需要串行执行
    pub(crate) fn guard() -> MutexGuard<'static, ()> {
        static GUARD: Mutex<()> = Mutex::new(());
        GUARD.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 安装只记录当前线程报告的处理器
    ///
    /// 其他测试线程并发产生的报告会被忽略。
    pub(crate) fn record_reports() -> Recorded {
        let calls: Recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let owner = std::thread::current().id();
        install_handler(move |status, operation, location| {
            if std::thread::current().id() != owner {
                return;
            }
            sink.lock().unwrap().push((
                status,
                operation.to_string(),
                location.file().to_string(),
                location.line(),
            ));
        });
        calls
    }
}
