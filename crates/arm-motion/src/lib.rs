//! # arm-motion
//!
//! 固定的抓取/放置动作目录与执行器：
//!
//! - **目录** (`catalogue`): `move_forward`、`circle_movement`、`triangle_movement`、
//!   `square_movement`、`pick_box`、`initial_position`
//! - **形状映射**: `circle → move_forward + circle_movement`，
//!   `triangle → move_forward + triangle_movement`，`square → square_movement`
//! - **执行器** (`sequencer`): 逐步阻塞执行，失败不回滚
//! - **门面** (`arm`): 驱动 + 执行器
//!
//! ```rust
//! use arm_driver::{MockServoDriver, NoSettle, ServoId, Deg};
//! use arm_motion::{Arm, Shape};
//! use std::sync::Arc;
//!
//! let mut arm = Arm::new(MockServoDriver::with_settle(Arc::new(NoSettle)), Arc::new(NoSettle));
//! arm.pick(Shape::Circle).unwrap();
//! assert_eq!(arm.angles().unwrap()[ServoId::at(1)], Deg(145.0));
//! ```

mod arm;
pub mod catalogue;
mod error;
pub mod sequencer;
pub mod step;

pub use arm::Arm;
pub use catalogue::{MovementSequence, SequenceName, Shape};
pub use error::MotionError;
pub use sequencer::{RunReport, Sequencer};
pub use step::{Action, Leaf, MoveStep};
