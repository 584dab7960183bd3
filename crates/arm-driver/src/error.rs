//! 驱动层错误类型定义

use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 目标角度超出舵机可接受范围（0-180°）或不是有限值
    #[error("Angle out of range: {angle}")]
    AngleOutOfRange { angle: f64 },

    /// 总线通讯错误（I2C 读写失败、模拟故障等）
    #[error("Bus error: {0}")]
    Bus(String),

    /// I2C 设备错误
    #[cfg(all(target_os = "linux", feature = "hardware"))]
    #[error("I2C error: {0}")]
    I2c(#[from] rppal::i2c::Error),

    /// 当前平台/构建不支持该驱动
    #[error("Unsupported driver: {0}")]
    Unsupported(String),

    /// 配置无效
    #[error("Invalid driver configuration: {0}")]
    InvalidConfig(String),
}
