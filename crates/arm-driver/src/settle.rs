//! 舵机稳定等待（settle）抽象
//!
//! 舵机没有位置反馈，发出指令后只能阻塞固定时长等待其到位。
//! 把等待抽象为 [`Settle`]，测试中可以替换为 [`NoSettle`] 或 [`RecordingSettle`]，
//! 不必真的等待。

use parking_lot::Mutex;
use std::time::Duration;

/// 阻塞等待
pub trait Settle: Send + Sync {
    /// 阻塞 `duration`
    fn settle(&self, duration: Duration);
}

/// 真实等待（spin_sleep，低抖动）
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinSettle {
    sleeper: spin_sleep::SpinSleeper,
}

impl SpinSettle {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Settle for SpinSettle {
    fn settle(&self, duration: Duration) {
        if !duration.is_zero() {
            self.sleeper.sleep(duration);
        }
    }
}

/// 不等待（开发/测试）
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSettle;

impl Settle for NoSettle {
    fn settle(&self, _duration: Duration) {}
}

/// 记录每次等待请求但不真正阻塞
#[derive(Debug, Default)]
pub struct RecordingSettle {
    log: Mutex<Vec<Duration>>,
}

impl RecordingSettle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录的等待时长（按调用顺序）
    pub fn recorded(&self) -> Vec<Duration> {
        self.log.lock().clone()
    }

    /// 等待总时长
    pub fn total(&self) -> Duration {
        self.log.lock().iter().sum()
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl Settle for RecordingSettle {
    fn settle(&self, duration: Duration) {
        self.log.lock().push(duration);
    }
}
