//! 舵机 PWM 参数与角度/脉宽换算
//!
//! PCA9685 是 12 位 PWM：每个周期 4096 个 tick。舵机角度线性映射到
//! `[min_pulse_us, max_pulse_us]` 的脉宽，再换算为 tick 数。

use crate::error::DriverError;
use crate::servo::{Deg, SERVO_COUNT};

/// PCA9685 内部振荡器频率（Hz）
pub const OSCILLATOR_HZ: f64 = 25_000_000.0;

/// 每个 PWM 周期的 tick 数（12 位）
pub const TICKS_PER_PERIOD: u16 = 4096;

/// PWM/舵机参数
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PwmConfig {
    /// I2C 总线号（Raspberry Pi 上为 1）
    pub bus: u8,
    /// PCA9685 I2C 地址
    pub address: u16,
    /// PWM 频率（Hz），模拟舵机一般为 50Hz
    pub frequency_hz: f64,
    /// 0° 对应的脉宽（μs）
    pub min_pulse_us: f64,
    /// `actuation_range` 对应的脉宽（μs）
    pub max_pulse_us: f64,
    /// 舵机行程（度）
    pub actuation_range: f64,
    /// 舵机 i 接在 PWM 通道 `channels[i]`
    pub channels: [u8; SERVO_COUNT],
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            bus: 1,
            address: 0x40,
            frequency_hz: 50.0,
            min_pulse_us: 750.0,
            max_pulse_us: 2250.0,
            actuation_range: 180.0,
            channels: [0, 1, 2, 3, 4, 5],
        }
    }
}

impl PwmConfig {
    /// 检查参数是否自洽
    pub fn validate(&self) -> Result<(), DriverError> {
        if !(self.frequency_hz.is_finite() && (24.0..=1526.0).contains(&self.frequency_hz)) {
            return Err(DriverError::InvalidConfig(format!(
                "frequency_hz {} outside PCA9685 range [24, 1526]",
                self.frequency_hz
            )));
        }
        if !(self.min_pulse_us > 0.0 && self.min_pulse_us < self.max_pulse_us) {
            return Err(DriverError::InvalidConfig(format!(
                "pulse range [{}, {}] is empty",
                self.min_pulse_us, self.max_pulse_us
            )));
        }
        if self.max_pulse_us >= self.period_us() {
            return Err(DriverError::InvalidConfig(format!(
                "max_pulse_us {} does not fit in a {:.0}us period",
                self.max_pulse_us,
                self.period_us()
            )));
        }
        if self.actuation_range <= 0.0 {
            return Err(DriverError::InvalidConfig(
                "actuation_range must be positive".to_string(),
            ));
        }
        if let Some(ch) = self.channels.iter().find(|&&ch| ch > 15) {
            return Err(DriverError::InvalidConfig(format!(
                "channel {ch} out of range [0, 15]"
            )));
        }
        Ok(())
    }

    /// PWM 周期（μs）
    #[inline]
    pub fn period_us(&self) -> f64 {
        1_000_000.0 / self.frequency_hz
    }

    /// PRESCALE 寄存器值：`round(osc / (4096 × f)) − 1`
    pub fn prescale(&self) -> u8 {
        let value = (OSCILLATOR_HZ / (f64::from(TICKS_PER_PERIOD) * self.frequency_hz)).round() - 1.0;
        value.clamp(3.0, 255.0) as u8
    }

    /// 角度 → 脉宽（μs）
    pub fn angle_to_pulse_us(&self, angle: Deg) -> f64 {
        let span = self.max_pulse_us - self.min_pulse_us;
        self.min_pulse_us + span * (angle.0 / self.actuation_range)
    }

    /// 角度 → OFF tick（ON tick 固定为 0）
    pub fn angle_to_ticks(&self, angle: Deg) -> u16 {
        let pulse = self.angle_to_pulse_us(angle);
        let ticks = (pulse * f64::from(TICKS_PER_PERIOD) / self.period_us()).round();
        ticks.clamp(0.0, f64::from(TICKS_PER_PERIOD - 1)) as u16
    }

    /// OFF tick → 角度，保留一位小数
    pub fn ticks_to_angle(&self, ticks: u16) -> Deg {
        let pulse = f64::from(ticks) * self.period_us() / f64::from(TICKS_PER_PERIOD);
        let span = self.max_pulse_us - self.min_pulse_us;
        let angle = (pulse - self.min_pulse_us) / span * self.actuation_range;
        let angle = angle.clamp(0.0, self.actuation_range);
        Deg((angle * 10.0).round() / 10.0)
    }
}
