//! PCA9685 舵机驱动（I2C）
//!
//! 寄存器布局参考 PCA9685 数据手册：
//! - `MODE1` (0x00): SLEEP/AI/RESTART 位
//! - `LEDn_ON_L` (0x06 + 4n): 每个通道 4 个字节 ON_L/ON_H/OFF_L/OFF_H
//! - `ALL_LED_OFF_H` (0xFD): bit4 = 全部通道强制关闭
//! - `PRESCALE` (0xFE): 仅在 SLEEP 时可写
//!
//! 驱动本身只依赖 [`I2cBus`]；Linux + `hardware` feature 下由 rppal 的 `I2c` 实现，
//! 通过 [`Pca9685Driver::open`] 打开。

use crate::driver::{ServoDriver, check_angle};
use crate::error::DriverError;
use crate::pwm::PwmConfig;
use crate::servo::{DEFAULT_POSE, Deg, SERVO_COUNT, ServoArray, ServoId};
use crate::settle::Settle;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const MODE1: u8 = 0x00;
const LED0_ON_L: u8 = 0x06;
const ALL_LED_OFF_H: u8 = 0xFD;
const PRESCALE: u8 = 0xFE;

const MODE1_RESTART: u8 = 0x80;
const MODE1_AI: u8 = 0x20;
const MODE1_SLEEP: u8 = 0x10;
const FULL_OFF: u8 = 0x10;

/// OFF_H 中只有低 4 位是 tick，bit4 是 full-off
const OFF_H_TICK_MASK: u8 = 0x0F;

/// PCA9685 所需的 I2C 寄存器访问
pub trait I2cBus: Send {
    /// 写单个寄存器
    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), DriverError>;

    /// 从 `register` 开始连续写（芯片需开启自动递增）
    fn write_block(&mut self, register: u8, data: &[u8]) -> Result<(), DriverError>;

    /// 从 `register` 开始连续读
    fn read_block(&mut self, register: u8, buf: &mut [u8]) -> Result<(), DriverError>;
}

#[cfg(all(target_os = "linux", feature = "hardware"))]
impl I2cBus for rppal::i2c::I2c {
    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), DriverError> {
        self.smbus_write_byte(register, value)?;
        Ok(())
    }

    fn write_block(&mut self, register: u8, data: &[u8]) -> Result<(), DriverError> {
        self.block_write(register, data)?;
        Ok(())
    }

    fn read_block(&mut self, register: u8, buf: &mut [u8]) -> Result<(), DriverError> {
        self.write_read(&[register], buf)?;
        Ok(())
    }
}

/// PCA9685 舵机驱动
pub struct Pca9685Driver<B: I2cBus> {
    bus: B,
    config: PwmConfig,
    settle: Arc<dyn Settle>,
    move_settle: Duration,
    reset_settle: Duration,
}

#[cfg(all(target_os = "linux", feature = "hardware"))]
impl Pca9685Driver<rppal::i2c::I2c> {
    /// 打开 `/dev/i2c-{bus}` 并初始化 PCA9685
    pub fn open(
        config: PwmConfig,
        settle: Arc<dyn Settle>,
        move_settle: Duration,
        reset_settle: Duration,
    ) -> Result<Self, DriverError> {
        config.validate()?;

        let mut i2c = rppal::i2c::I2c::with_bus(config.bus)?;
        i2c.set_slave_address(config.address)?;
        Self::with_bus(i2c, config, settle, move_settle, reset_settle)
    }
}

impl<B: I2cBus> Pca9685Driver<B> {
    /// 在已打开的总线上初始化芯片（设置 PWM 频率、开启自动递增）
    pub fn with_bus(
        bus: B,
        config: PwmConfig,
        settle: Arc<dyn Settle>,
        move_settle: Duration,
        reset_settle: Duration,
    ) -> Result<Self, DriverError> {
        config.validate()?;

        let mut driver = Self {
            bus,
            config,
            settle,
            move_settle,
            reset_settle,
        };
        driver.init_chip()?;

        info!(
            bus = driver.config.bus,
            address = %format!("{:#04x}", driver.config.address),
            frequency_hz = driver.config.frequency_hz,
            "PCA9685 initialized"
        );
        Ok(driver)
    }

    fn init_chip(&mut self) -> Result<(), DriverError> {
        let prescale = self.config.prescale();
        // PRESCALE 只能在 SLEEP 模式下写入
        self.bus.write_byte(MODE1, MODE1_SLEEP)?;
        self.bus.write_byte(PRESCALE, prescale)?;
        self.bus.write_byte(MODE1, MODE1_AI)?;
        // 振荡器唤醒至少 500μs
        std::thread::sleep(Duration::from_millis(5));
        self.bus.write_byte(MODE1, MODE1_RESTART | MODE1_AI)?;
        debug!(prescale, "PCA9685 prescale written");
        Ok(())
    }

    #[inline]
    fn channel_register(&self, servo: ServoId) -> u8 {
        LED0_ON_L + 4 * self.config.channels[servo.index()]
    }

    fn write_servo(&mut self, servo: ServoId, angle: Deg) -> Result<(), DriverError> {
        let ticks = self.config.angle_to_ticks(angle);
        let [off_l, off_h] = ticks.to_le_bytes();
        let register = self.channel_register(servo);
        self.bus.write_block(register, &[0, 0, off_l, off_h])?;
        debug!(servo = servo.index(), angle = angle.0, ticks, "servo PWM written");
        Ok(())
    }

    fn read_servo(&mut self, servo: ServoId) -> Result<Deg, DriverError> {
        let register = self.channel_register(servo);
        let mut buf = [0u8; 4];
        self.bus.read_block(register, &mut buf)?;
        let ticks = u16::from_le_bytes([buf[2], buf[3] & OFF_H_TICK_MASK]);
        Ok(self.config.ticks_to_angle(ticks))
    }
}

impl<B: I2cBus> ServoDriver for Pca9685Driver<B> {
    fn name(&self) -> &'static str {
        "pca9685"
    }

    fn set_angle(&mut self, servo: ServoId, angle: Deg) -> Result<(), DriverError> {
        check_angle(angle)?;
        self.write_servo(servo, angle)?;
        self.settle.settle(self.move_settle);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), DriverError> {
        for servo in ServoId::ALL {
            self.write_servo(servo, DEFAULT_POSE[servo])?;
            self.settle.settle(self.reset_settle);
        }
        Ok(())
    }

    fn read_angles(&mut self) -> Result<ServoArray<Deg>, DriverError> {
        let mut angles = [Deg(0.0); SERVO_COUNT];
        for servo in ServoId::ALL {
            angles[servo.index()] = self.read_servo(servo)?;
        }
        Ok(ServoArray::new(angles))
    }

    fn release(&mut self) -> Result<(), DriverError> {
        info!("releasing PCA9685 outputs");
        self.bus.write_byte(ALL_LED_OFF_H, FULL_OFF)?;
        Ok(())
    }
}

impl<B: I2cBus> Drop for Pca9685Driver<B> {
    fn drop(&mut self) {
        if let Err(e) = self.bus.write_byte(ALL_LED_OFF_H, FULL_OFF) {
            warn!("failed to switch PCA9685 outputs off on drop: {}", e);
        }
    }
}
