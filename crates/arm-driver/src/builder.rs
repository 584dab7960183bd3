//! Builder 模式实现
//!
//! 启动时根据配置选择 Mock 或 PCA9685 驱动，返回 `Box<dyn ServoDriver>`。

use crate::driver::ServoDriver;
use crate::error::DriverError;
use crate::mock::{MOCK_MOVE_SETTLE, MOCK_RESET_SETTLE, MockServoDriver};
use crate::pwm::PwmConfig;
use crate::settle::{Settle, SpinSettle};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 驱动类型选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DriverKind {
    /// 内存模拟（默认）
    #[default]
    Mock,
    /// PCA9685 over I2C（仅 Linux + `hardware` feature）
    Hardware,
}

impl DriverKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            DriverKind::Mock => "mock",
            DriverKind::Hardware => "hardware",
        }
    }

    /// 该驱动的默认 settle 时长 `(move, reset)`
    pub const fn default_settle(self) -> (Duration, Duration) {
        match self {
            DriverKind::Mock => (MOCK_MOVE_SETTLE, MOCK_RESET_SETTLE),
            DriverKind::Hardware => (Duration::from_secs(1), Duration::from_secs(1)),
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverKind {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mock" => Ok(DriverKind::Mock),
            "hardware" | "pca9685" => Ok(DriverKind::Hardware),
            other => Err(DriverError::InvalidConfig(format!(
                "unknown driver kind '{other}' (expected 'mock' or 'hardware')"
            ))),
        }
    }
}

/// 驱动 Builder（链式构造）
///
/// # Example
///
/// ```
/// use arm_driver::{DriverBuilder, DriverKind, NoSettle, ServoDriver};
/// use std::sync::Arc;
///
/// let driver = DriverBuilder::new()
///     .kind(DriverKind::Mock)
///     .settle(Arc::new(NoSettle))
///     .build()
///     .unwrap();
/// assert_eq!(driver.name(), "mock");
/// ```
pub struct DriverBuilder {
    kind: DriverKind,
    settle: Option<Arc<dyn Settle>>,
    move_settle: Option<Duration>,
    reset_settle: Option<Duration>,
    pwm: PwmConfig,
}

impl DriverBuilder {
    pub fn new() -> Self {
        Self {
            kind: DriverKind::default(),
            settle: None,
            move_settle: None,
            reset_settle: None,
            pwm: PwmConfig::default(),
        }
    }

    pub fn kind(mut self, kind: DriverKind) -> Self {
        self.kind = kind;
        self
    }

    /// 自定义等待实现（默认 [`SpinSettle`]）
    pub fn settle(mut self, settle: Arc<dyn Settle>) -> Self {
        self.settle = Some(settle);
        self
    }

    /// 覆盖单次移动后的 settle 时长
    pub fn move_settle(mut self, duration: Duration) -> Self {
        self.move_settle = Some(duration);
        self
    }

    /// 覆盖 reset 的 settle 时长
    pub fn reset_settle(mut self, duration: Duration) -> Self {
        self.reset_settle = Some(duration);
        self
    }

    /// PCA9685 参数（Mock 忽略）
    pub fn pwm_config(mut self, pwm: PwmConfig) -> Self {
        self.pwm = pwm;
        self
    }

    pub fn build(self) -> Result<Box<dyn ServoDriver>, DriverError> {
        let (default_move, default_reset) = self.kind.default_settle();
        let move_settle = self.move_settle.unwrap_or(default_move);
        let reset_settle = self.reset_settle.unwrap_or(default_reset);
        let settle = self.settle.unwrap_or_else(|| Arc::new(SpinSettle::new()));

        info!(
            kind = %self.kind,
            move_settle_ms = move_settle.as_millis() as u64,
            reset_settle_ms = reset_settle.as_millis() as u64,
            "building servo driver"
        );

        match self.kind {
            DriverKind::Mock => Ok(Box::new(
                MockServoDriver::with_settle(settle)
                    .move_settle(move_settle)
                    .reset_settle(reset_settle),
            )),
            DriverKind::Hardware => build_hardware(self.pwm, settle, move_settle, reset_settle),
        }
    }
}

impl Default for DriverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(target_os = "linux", feature = "hardware"))]
fn build_hardware(
    pwm: PwmConfig,
    settle: Arc<dyn Settle>,
    move_settle: Duration,
    reset_settle: Duration,
) -> Result<Box<dyn ServoDriver>, DriverError> {
    let driver = crate::pca9685::Pca9685Driver::open(pwm, settle, move_settle, reset_settle)?;
    Ok(Box::new(driver))
}

#[cfg(not(all(target_os = "linux", feature = "hardware")))]
fn build_hardware(
    pwm: PwmConfig,
    _settle: Arc<dyn Settle>,
    _move_settle: Duration,
    _reset_settle: Duration,
) -> Result<Box<dyn ServoDriver>, DriverError> {
    pwm.validate()?;
    Err(DriverError::Unsupported(
        "hardware driver requires Linux and the `hardware` feature".to_string(),
    ))
}
