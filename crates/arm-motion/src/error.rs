//! 动作层错误类型定义

use crate::catalogue::SequenceName;
use arm_driver::DriverError;
use thiserror::Error;

/// 动作层错误类型
#[derive(Error, Debug)]
pub enum MotionError {
    /// 未知包裹形状
    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    /// 目录中没有该序列
    #[error("Unknown sequence: {0}")]
    UnknownSequence(String),

    /// 序列执行到第 `step` 步（展开后，从 0 开始）时驱动报错
    ///
    /// 之前的步骤不会回滚。
    #[error("{source} (at {sequence} step {step})")]
    Step {
        sequence: SequenceName,
        step: usize,
        #[source]
        source: DriverError,
    },

    /// 单条指令的驱动错误
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl MotionError {
    /// 底层驱动错误（输入错误时为 `None`）
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            MotionError::Step { source, .. } => Some(source),
            MotionError::Driver(e) => Some(e),
            _ => None,
        }
    }
}
