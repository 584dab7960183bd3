//! 动作步骤
//!
//! 动作序列由 [`Action`] 组成，全部是 `'static` 常量。

use crate::catalogue::SequenceName;
use arm_driver::{Deg, ServoId};
use std::time::Duration;

/// 单个舵机移动
///
/// `dwell` 是驱动自身 settle 之后的额外停留时间（大多数步骤为零）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveStep {
    pub servo: ServoId,
    pub angle: Deg,
    pub dwell: Duration,
}

impl MoveStep {
    /// const 构造，servo 越界时编译失败
    pub const fn new(servo: usize, angle: f64) -> Self {
        Self {
            servo: ServoId::at(servo),
            angle: Deg(angle),
            dwell: Duration::ZERO,
        }
    }

    /// 带额外停留时间
    pub const fn with_dwell(servo: usize, angle: f64, dwell: Duration) -> Self {
        Self {
            servo: ServoId::at(servo),
            angle: Deg(angle),
            dwell,
        }
    }
}

/// 动作序列中的一项
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// 移动一个舵机
    Move(MoveStep),
    /// 所有舵机回到初始姿态（`ServoDriver::reset`）
    Reset,
    /// 内联执行目录中的另一个序列
    Run(SequenceName),
}

/// 展开后的叶子动作（不含 `Run`）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leaf {
    Move(MoveStep),
    Reset,
}

/// 静态表里的 `(servo, angle)`
pub(crate) const fn mv(servo: usize, angle: f64) -> Action {
    Action::Move(MoveStep::new(servo, angle))
}
