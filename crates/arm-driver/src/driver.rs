//! 舵机驱动 trait
//!
//! Mock 和 PCA9685 两种后端实现同一个 [`ServoDriver`]，上层（动作序列、HTTP 层）只依赖 trait。

use crate::error::DriverError;
use crate::servo::{Deg, ServoArray, ServoId};

/// 舵机驱动
///
/// 所有方法都是阻塞的：`set_angle` 在写入角度后会等待驱动自己的 settle 时长再返回。
pub trait ServoDriver: Send {
    /// 驱动名称（用于日志）
    fn name(&self) -> &'static str;

    /// 设置单个舵机角度，并阻塞等待其稳定
    ///
    /// # 错误
    /// - [`DriverError::AngleOutOfRange`]: 角度不在 0-180° 内
    /// - [`DriverError::Bus`]: 总线写入失败
    fn set_angle(&mut self, servo: ServoId, angle: Deg) -> Result<(), DriverError>;

    /// 所有舵机回到 [`DEFAULT_POSE`](crate::DEFAULT_POSE)
    ///
    /// 等待方式由驱动决定：Mock 整体等待一次，PCA9685 逐个舵机等待。
    fn reset(&mut self) -> Result<(), DriverError>;

    /// 读取当前 6 个舵机角度
    fn read_angles(&mut self) -> Result<ServoArray<Deg>, DriverError>;

    /// 释放硬件（进程退出前调用）
    fn release(&mut self) -> Result<(), DriverError> {
        Ok(())
    }
}

/// 在写入前检查角度
pub(crate) fn check_angle(angle: Deg) -> Result<(), DriverError> {
    if angle.in_range() {
        Ok(())
    } else {
        Err(DriverError::AngleOutOfRange { angle: angle.0 })
    }
}

impl<D: ServoDriver + ?Sized> ServoDriver for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn set_angle(&mut self, servo: ServoId, angle: Deg) -> Result<(), DriverError> {
        (**self).set_angle(servo, angle)
    }

    fn reset(&mut self) -> Result<(), DriverError> {
        (**self).reset()
    }

    fn read_angles(&mut self) -> Result<ServoArray<Deg>, DriverError> {
        (**self).read_angles()
    }

    fn release(&mut self) -> Result<(), DriverError> {
        (**self).release()
    }
}
