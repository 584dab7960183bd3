//! # arm-driver
//!
//! 6 舵机机械臂的驱动层：
//!
//! - **舵机模型** (`servo`): `ServoId`、`Deg`、`ServoArray`、初始姿态
//! - **驱动 trait** (`driver`): `set_angle` / `reset` / `read_angles` / `release`
//! - **等待抽象** (`settle`): 舵机无反馈，指令后阻塞固定时长；测试中可替换
//! - **后端**: `MockServoDriver`（内存）和 `Pca9685Driver`（I2C；rppal 总线仅 Linux）
//! - **Builder** (`builder`): 启动时按配置选择后端
//!
//! ```rust
//! use arm_driver::{Deg, MockServoDriver, NoSettle, ServoDriver, ServoId};
//! use std::sync::Arc;
//!
//! let mut driver = MockServoDriver::with_settle(Arc::new(NoSettle));
//! driver.set_angle(ServoId::GRIPPER, Deg(180.0)).unwrap();
//! assert_eq!(driver.read_angles().unwrap()[ServoId::GRIPPER], Deg(180.0));
//! ```

mod builder;
mod driver;
mod error;
pub mod mock;
pub mod pca9685;
pub mod pwm;
pub mod servo;
pub mod settle;

pub use builder::{DriverBuilder, DriverKind};
pub use driver::ServoDriver;
pub use error::DriverError;
pub use mock::{MockCommand, MockServoDriver};
pub use pca9685::{I2cBus, Pca9685Driver};
pub use pwm::PwmConfig;
pub use servo::{ANGLE_MAX, ANGLE_MIN, DEFAULT_POSE, Deg, SERVO_COUNT, ServoArray, ServoId};
pub use settle::{NoSettle, RecordingSettle, Settle, SpinSettle};
