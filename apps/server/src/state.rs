//! 共享应用状态
//!
//! 机械臂只有一个实例，由 `AppState` 持有并注入到各个 handler。
//! 所有驱动调用都在阻塞线程池中执行，并持有同一把锁：两个请求的动作步骤不会交错。

use crate::error::ApiError;
use arm_motion::{Arm, MotionError};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    arm: Arc<Mutex<Arm>>,
}

impl AppState {
    pub fn new(arm: Arm) -> Self {
        Self {
            arm: Arc::new(Mutex::new(arm)),
        }
    }

    /// 在阻塞线程池中独占机械臂执行 `f`
    pub async fn with_arm<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Arm) -> Result<T, MotionError> + Send + 'static,
        T: Send + 'static,
    {
        let arm = Arc::clone(&self.arm);
        let result = tokio::task::spawn_blocking(move || {
            let mut arm = arm.lock();
            f(&mut arm)
        })
        .await?;
        Ok(result?)
    }

    /// 释放驱动（服务退出时调用）
    pub async fn release(&self) {
        if let Err(e) = self.with_arm(|arm| arm.release()).await {
            error!("failed to release driver: {}", e);
        }
    }
}
