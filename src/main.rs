//! ca-foundation - Core Audio 状态码与属性工具
//!
//! - decode: 状态码 → 可读文本
//! - encode: 4 字符代码 → 整数
//! - inspect: 探测音频文件的常用属性（仅 macOS）

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use ca_foundation::diag::{self, DiagnosticConfig};
use ca_foundation::status::{codec, StatusCode};

/// Core Audio status code and property toolkit
#[derive(Parser)]
#[command(name = "ca-foundation")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Label printed in front of diagnostic lines
    #[arg(long, default_value = "Core Audio")]
    context: String,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a status code (decimal, 0x hex, or four-character tag)
    Decode {
        /// Status value
        status: String,
    },

    /// Pack a four-character code into an integer
    Encode {
        /// Exactly four bytes, e.g. 'fmt '
        code: String,
    },

    /// Probe the common properties of an audio file (macOS only)
    Inspect {
        /// Audio file
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    diag::configure(DiagnosticConfig {
        context: cli.context.clone().into(),
        ..Default::default()
    });

    match cli.command {
        Commands::Decode { ref status } => decode(status)?,
        Commands::Encode { ref code } => encode(code)?,
        Commands::Inspect { ref file } => inspect(file)?,
    }

    Ok(())
}

fn decode(input: &str) -> anyhow::Result<()> {
    let status: StatusCode = input.parse()?;
    let category = status
        .category()
        .map(|c| format!(" [{:?}]", c))
        .unwrap_or_default();
    println!("{} ({}){}", status, status.0, category);
    Ok(())
}

fn encode(code: &str) -> anyhow::Result<()> {
    let value = codec::encode(code)?;
    println!("{} = {} (0x{:08X})", codec::decode(value), value, value as u32);
    Ok(())
}

#[cfg(target_os = "macos")]
fn inspect(path: &Path) -> anyhow::Result<()> {
    use ca_foundation::property::{ids, AudioFile, PropertySourceExt};
    use ca_foundation::timing::measure;

    let (file, open_secs) = measure(|| AudioFile::open(path));
    let file = file?;
    log::info!("Opened in {:.3} ms", open_secs * 1_000.0);

    println!("=== {} ===\n", path.display());

    let (supported, probe_secs) = measure(|| file.supported_properties(ids::COMMON));
    for (id, info) in &supported {
        let access = if info.writable { "rw" } else { "r-" };
        println!("{} {:>8} bytes  {}", id, info.size, access);
    }
    println!("\n{} of {} properties supported", supported.len(), ids::COMMON.len());
    log::info!("Probed in {:.3} ms", probe_secs * 1_000.0);

    if let Some(asbd) = file.data_format()? {
        println!("\n{}", asbd);
    }

    if let Some(duration) = file.estimated_duration()? {
        println!("\nEstimated duration: {:.3} s", duration);
    }

    if let Some(info) = file.info_dictionary()? {
        println!("\nInfo dictionary:");
        for (key, value) in info {
            println!("  {}: {}", key, value);
        }
    }

    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn inspect(path: &Path) -> anyhow::Result<()> {
    anyhow::bail!(
        "cannot inspect {}: AudioToolbox is only available on macOS",
        path.display()
    )
}
