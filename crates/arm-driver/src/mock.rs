//! Mock 舵机驱动
//!
//! 无硬件依赖，状态只保存在内存中，用于开发和测试。

use crate::driver::{ServoDriver, check_angle};
use crate::error::DriverError;
use crate::servo::{DEFAULT_POSE, Deg, ServoArray, ServoId};
use crate::settle::{Settle, SpinSettle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Mock 默认 settle 时长
pub const MOCK_MOVE_SETTLE: Duration = Duration::from_millis(100);

/// Mock reset 的 settle 时长（整个姿态只等待一次）
pub const MOCK_RESET_SETTLE: Duration = Duration::from_millis(100);

/// 驱动收到的一条指令（用于测试断言执行顺序）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockCommand {
    Move(ServoId, Deg),
    Reset,
}

/// Mock 舵机驱动
pub struct MockServoDriver {
    state: ServoArray<Deg>,
    settle: Arc<dyn Settle>,
    move_settle: Duration,
    reset_settle: Duration,
    /// 还剩多少次成功操作后开始模拟总线故障
    fault_after: Option<usize>,
    history: Vec<MockCommand>,
}

impl MockServoDriver {
    /// 初始姿态、真实等待
    pub fn new() -> Self {
        Self::with_settle(Arc::new(SpinSettle::new()))
    }

    /// 初始姿态、自定义等待
    pub fn with_settle(settle: Arc<dyn Settle>) -> Self {
        Self {
            state: DEFAULT_POSE,
            settle,
            move_settle: MOCK_MOVE_SETTLE,
            reset_settle: MOCK_RESET_SETTLE,
            fault_after: None,
            history: Vec::new(),
        }
    }

    /// 从指定姿态开始
    pub fn with_pose(mut self, pose: ServoArray<Deg>) -> Self {
        self.state = pose;
        self
    }

    pub fn move_settle(mut self, duration: Duration) -> Self {
        self.move_settle = duration;
        self
    }

    pub fn reset_settle(mut self, duration: Duration) -> Self {
        self.reset_settle = duration;
        self
    }

    /// 再成功执行 `ops` 次操作后，之后的每次操作都返回 [`DriverError::Bus`]
    pub fn fail_after(&mut self, ops: usize) {
        self.fault_after = Some(ops);
    }

    /// 清除模拟故障
    pub fn clear_fault(&mut self) {
        self.fault_after = None;
    }

    /// 当前状态（不经过 trait，不会触发模拟故障）
    pub fn state(&self) -> ServoArray<Deg> {
        self.state
    }

    /// 已成功执行的指令
    pub fn history(&self) -> &[MockCommand] {
        &self.history
    }

    fn bus_op(&mut self) -> Result<(), DriverError> {
        match self.fault_after {
            Some(0) => Err(DriverError::Bus("simulated bus fault".to_string())),
            Some(ref mut remaining) => {
                *remaining -= 1;
                Ok(())
            },
            None => Ok(()),
        }
    }
}

impl Default for MockServoDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ServoDriver for MockServoDriver {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn set_angle(&mut self, servo: ServoId, angle: Deg) -> Result<(), DriverError> {
        check_angle(angle)?;
        self.bus_op()?;

        trace!(servo = servo.index(), angle = angle.0, "mock set_angle");
        self.state[servo] = angle;
        self.history.push(MockCommand::Move(servo, angle));
        self.settle.settle(self.move_settle);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), DriverError> {
        self.bus_op()?;

        debug!("mock reset to initial pose");
        self.state = DEFAULT_POSE;
        self.history.push(MockCommand::Reset);
        self.settle.settle(self.reset_settle);
        Ok(())
    }

    fn read_angles(&mut self) -> Result<ServoArray<Deg>, DriverError> {
        Ok(self.state)
    }
}
