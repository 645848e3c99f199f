//! tracing -> 浏览器控制台
//!
//! 每条事件格式化成一行后按级别写到 `console.*`。wasm32 上没有系统时钟，
//! 所以关闭时间戳；控制台不识别 ANSI 颜色，也一并关闭。

use std::io;
use std::str::FromStr;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_LEVEL: Level = Level::INFO;

pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buf);
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        let msg = wasm_bindgen::JsValue::from_str(line);
        match self.level {
            Level::ERROR => web_sys::console::error_1(&msg),
            Level::WARN => web_sys::console::warn_1(&msg),
            Level::INFO => web_sys::console::info_1(&msg),
            _ => web_sys::console::debug_1(&msg),
        }
    }
}

pub struct MakeConsoleWriter;

impl<'a> MakeWriter<'a> for MakeConsoleWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: DEFAULT_LEVEL,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

/// 安装全局 subscriber；级别取自构建时的 `MEBELI_LOG`
pub fn init() {
    let level = option_env!("MEBELI_LOG")
        .and_then(|raw| Level::from_str(raw.trim()).ok())
        .unwrap_or(DEFAULT_LEVEL);

    let installed = tracing_subscriber::fmt()
        .with_writer(MakeConsoleWriter)
        .with_max_level(level)
        .with_ansi(false)
        .without_time()
        .try_init();

    if installed.is_err() {
        web_sys::console::warn_1(&"tracing subscriber already installed".into());
    }
}
