//! 区间计时器
//!
//! 以单调纳秒为单位交替测量 mutator 区间与回收停顿。`close` 累加
//! 已经过的时间，`open` 重新开始计时，`reset` 清零累计值。一次
//! close-open 配对可以在不丢失测量的情况下读取当前累计值。

use std::sync::OnceLock;
use std::time::Instant;

/// 进程内单调纳秒时钟
pub fn monotonic_nanos() -> u64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = *EPOCH.get_or_init(Instant::now);
    Instant::now().duration_since(epoch).as_nanos() as u64
}

/// 纳秒转秒
pub fn nanos_to_seconds(nanos: u64) -> f64 {
    nanos as f64 / 1_000_000_000.0
}

/// 区间计时器
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    /// 纳秒时钟来源
    source: fn() -> u64,
    /// 打开时刻；关闭状态下为 None
    opened_at: Option<u64>,
    /// 累计纳秒
    accumulated_nanos: u64,
}

impl IntervalTimer {
    /// 创建使用单调时钟的计时器
    pub fn new() -> Self {
        Self::with_source(monotonic_nanos)
    }

    /// 创建使用指定纳秒来源的计时器，测试时可注入合成时钟
    pub fn with_source(source: fn() -> u64) -> Self {
        Self {
            source,
            opened_at: None,
            accumulated_nanos: 0,
        }
    }

    /// 开始计时；已打开时重置起点
    pub fn open(&mut self) {
        self.opened_at = Some((self.source)());
    }

    /// 停止计时并累加经过的纳秒；未打开时无效果
    pub fn close(&mut self) {
        if let Some(opened_at) = self.opened_at.take() {
            self.accumulated_nanos += (self.source)().saturating_sub(opened_at);
        }
    }

    /// 清零累计值
    pub fn reset(&mut self) {
        self.accumulated_nanos = 0;
    }

    /// 累计的纳秒数
    pub fn measured_nanos(&self) -> u64 {
        self.accumulated_nanos
    }

    /// 是否正在计时
    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new()
    }
}
