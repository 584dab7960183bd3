//! 序列执行器
//!
//! 严格按顺序执行目录中的动作：每一步都阻塞到驱动 settle（以及该步的 dwell）结束后才进入下一步。
//! 中途失败不回滚，已执行的步骤保持生效。

use crate::catalogue::SequenceName;
use crate::error::MotionError;
use crate::step::{Action, Leaf};
use arm_driver::{ServoDriver, Settle};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// 一次序列执行的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub sequence: SequenceName,
    /// 执行的叶子动作数
    pub steps: usize,
}

/// 序列执行器
pub struct Sequencer {
    settle: Arc<dyn Settle>,
}

impl Sequencer {
    /// `settle` 用于步骤的额外停留（dwell）
    pub fn new(settle: Arc<dyn Settle>) -> Self {
        Self { settle }
    }

    /// 把序列展开为叶子动作（`Run` 被内联），不触碰驱动
    pub fn plan(name: SequenceName) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        expand(name, &mut leaves);
        leaves
    }

    /// 执行序列
    pub fn run<D>(&self, driver: &mut D, name: SequenceName) -> Result<RunReport, MotionError>
    where
        D: ServoDriver + ?Sized,
    {
        let plan = Self::plan(name);
        let started = Instant::now();
        info!(sequence = %name, steps = plan.len(), driver = driver.name(), "running sequence");

        for (index, leaf) in plan.iter().enumerate() {
            let result = match leaf {
                Leaf::Move(step) => {
                    debug!(
                        sequence = %name,
                        step = index,
                        servo = step.servo.index(),
                        angle = step.angle.0,
                        "move"
                    );
                    driver.set_angle(step.servo, step.angle).map(|()| {
                        if !step.dwell.is_zero() {
                            self.settle.settle(step.dwell);
                        }
                    })
                },
                Leaf::Reset => {
                    debug!(sequence = %name, step = index, "reset");
                    driver.reset()
                },
            };

            if let Err(source) = result {
                warn!(sequence = %name, step = index, "sequence aborted: {}", source);
                return Err(MotionError::Step {
                    sequence: name,
                    step: index,
                    source,
                });
            }
        }

        info!(
            sequence = %name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sequence completed"
        );
        Ok(RunReport {
            sequence: name,
            steps: plan.len(),
        })
    }
}

fn expand(name: SequenceName, out: &mut Vec<Leaf>) {
    for action in name.sequence().actions {
        match *action {
            Action::Move(step) => out.push(Leaf::Move(step)),
            Action::Reset => out.push(Leaf::Reset),
            Action::Run(inner) => expand(inner, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arm_driver::{
        DEFAULT_POSE, Deg, MockCommand, MockServoDriver, NoSettle, RecordingSettle, ServoId,
    };
    use std::time::Duration;

    fn mock() -> MockServoDriver {
        MockServoDriver::with_settle(Arc::new(NoSettle))
    }

    #[test]
    fn test_plan_inlines_nested_sequences() {
        let square = Sequencer::plan(SequenceName::Square);
        // move_forward(13) + 7 + reset
        assert_eq!(square.len(), 21);
        assert_eq!(&square[..13], Sequencer::plan(SequenceName::MoveForward).as_slice());
        assert_eq!(square.last(), Some(&Leaf::Reset));
    }

    #[test]
    fn test_run_applies_steps_in_order() {
        let sequencer = Sequencer::new(Arc::new(NoSettle));
        let mut driver = mock();

        let report = sequencer.run(&mut driver, SequenceName::Circle).unwrap();
        assert_eq!(report.steps, 7);

        let expected: Vec<MockCommand> = Sequencer::plan(SequenceName::Circle)
            .into_iter()
            .map(|leaf| match leaf {
                Leaf::Move(step) => MockCommand::Move(step.servo, step.angle),
                Leaf::Reset => MockCommand::Reset,
            })
            .collect();
        assert_eq!(driver.history(), expected.as_slice());
    }

    #[test]
    fn test_dwell_goes_through_sequencer_settle() {
        let dwell = Arc::new(RecordingSettle::new());
        let sequencer = Sequencer::new(dwell.clone());
        let mut driver = mock();

        sequencer.run(&mut driver, SequenceName::PickBox).unwrap();
        assert_eq!(
            dwell.recorded(),
            vec![Duration::from_millis(1500), Duration::from_secs(1)]
        );
        assert_eq!(driver.state()[ServoId::GRIPPER], Deg(0.0));

        // 其他序列没有 dwell
        dwell.clear();
        sequencer.run(&mut driver, SequenceName::MoveForward).unwrap();
        assert!(dwell.recorded().is_empty());
    }

    #[test]
    fn test_failure_mid_sequence_keeps_prior_steps() {
        let sequencer = Sequencer::new(Arc::new(NoSettle));
        let mut driver = mock();
        driver.fail_after(4);

        let err = sequencer
            .run(&mut driver, SequenceName::MoveForward)
            .unwrap_err();
        match err {
            MotionError::Step { sequence, step, .. } => {
                assert_eq!(sequence, SequenceName::MoveForward);
                assert_eq!(step, 4);
            },
            other => panic!("unexpected error: {other}"),
        }

        // 前 4 步：(1,130) (4,170) (1,120) (5,180)
        let state = driver.state();
        assert_eq!(state[ServoId::at(1)], Deg(120.0));
        assert_eq!(state[ServoId::at(4)], Deg(170.0));
        assert_eq!(state[ServoId::at(5)], Deg(180.0));
        assert_eq!(state[ServoId::at(2)], DEFAULT_POSE[ServoId::at(2)]);
        assert_eq!(driver.history().len(), 4);
    }

    #[test]
    fn test_run_through_boxed_driver() {
        let sequencer = Sequencer::new(Arc::new(NoSettle));
        let mut driver: Box<dyn ServoDriver> = Box::new(mock());
        sequencer
            .run(driver.as_mut(), SequenceName::InitialPosition)
            .unwrap();
        assert_eq!(driver.read_angles().unwrap(), DEFAULT_POSE);
    }
}
