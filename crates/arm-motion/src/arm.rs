//! 机械臂门面
//!
//! 持有驱动和序列执行器，对上层（HTTP）提供一组阻塞操作。
//! `Arm` 本身不做并发控制，调用方需要保证同一时间只有一个请求在驱动它。

use crate::catalogue::{SequenceName, Shape};
use crate::error::MotionError;
use crate::sequencer::{RunReport, Sequencer};
use arm_driver::{Deg, ServoArray, ServoDriver, ServoId, Settle};
use std::sync::Arc;
use tracing::info;

/// 机械臂
pub struct Arm<D: ServoDriver = Box<dyn ServoDriver>> {
    driver: D,
    sequencer: Sequencer,
}

impl<D: ServoDriver> Arm<D> {
    pub fn new(driver: D, settle: Arc<dyn Settle>) -> Self {
        Self {
            driver,
            sequencer: Sequencer::new(settle),
        }
    }

    /// 移动单个舵机
    pub fn move_servo(&mut self, servo: ServoId, angle: Deg) -> Result<(), MotionError> {
        info!(servo = servo.index(), angle = angle.0, "moving servo");
        self.driver.set_angle(servo, angle)?;
        Ok(())
    }

    /// 回到初始姿态
    pub fn reset(&mut self) -> Result<(), MotionError> {
        info!("returning to initial position");
        self.driver.reset()?;
        Ok(())
    }

    /// 执行目录中的一个序列
    pub fn run(&mut self, name: SequenceName) -> Result<RunReport, MotionError> {
        self.sequencer.run(&mut self.driver, name)
    }

    /// 抓取并放置指定形状的包裹
    pub fn pick(&mut self, shape: Shape) -> Result<Vec<RunReport>, MotionError> {
        info!(%shape, "picking package");
        shape
            .sequences()
            .iter()
            .map(|&name| self.run(name))
            .collect()
    }

    /// 当前舵机角度
    pub fn angles(&mut self) -> Result<ServoArray<Deg>, MotionError> {
        Ok(self.driver.read_angles()?)
    }

    /// 释放硬件
    pub fn release(&mut self) -> Result<(), MotionError> {
        info!(driver = self.driver.name(), "releasing driver");
        self.driver.release()?;
        Ok(())
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
