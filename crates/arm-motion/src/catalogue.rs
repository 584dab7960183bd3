//! 动作序列目录
//!
//! 所有角度都是现场标定的结果，按原样保留，不要重新推导。

use crate::error::MotionError;
use crate::step::{Action, MoveStep, mv};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 序列名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceName {
    InitialPosition,
    MoveForward,
    Circle,
    Triangle,
    Square,
    PickBox,
}

impl SequenceName {
    /// 目录顺序
    pub const ALL: [SequenceName; 6] = [
        SequenceName::InitialPosition,
        SequenceName::MoveForward,
        SequenceName::Circle,
        SequenceName::Triangle,
        SequenceName::Square,
        SequenceName::PickBox,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SequenceName::InitialPosition => "initial_position",
            SequenceName::MoveForward => "move_forward",
            SequenceName::Circle => "circle_movement",
            SequenceName::Triangle => "triangle_movement",
            SequenceName::Square => "square_movement",
            SequenceName::PickBox => "pick_box",
        }
    }

    /// 对应的目录条目
    pub fn sequence(self) -> &'static MovementSequence {
        match self {
            SequenceName::InitialPosition => &INITIAL_POSITION,
            SequenceName::MoveForward => &MOVE_FORWARD,
            SequenceName::Circle => &CIRCLE,
            SequenceName::Triangle => &TRIANGLE,
            SequenceName::Square => &SQUARE,
            SequenceName::PickBox => &PICK_BOX,
        }
    }
}

impl fmt::Display for SequenceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SequenceName {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial_position" | "all_initial_position" => Ok(SequenceName::InitialPosition),
            "move_forward" => Ok(SequenceName::MoveForward),
            "circle_movement" | "circle" => Ok(SequenceName::Circle),
            "triangle_movement" | "triangle" => Ok(SequenceName::Triangle),
            "square_movement" | "square" => Ok(SequenceName::Square),
            "pick_box" => Ok(SequenceName::PickBox),
            other => Err(MotionError::UnknownSequence(other.to_string())),
        }
    }
}

/// 命名的动作序列
#[derive(Debug, PartialEq)]
pub struct MovementSequence {
    pub name: SequenceName,
    pub actions: &'static [Action],
}

/// 回到初始姿态
pub static INITIAL_POSITION: MovementSequence = MovementSequence {
    name: SequenceName::InitialPosition,
    actions: &[Action::Reset],
};

/// 前伸：舵机 1 逐步下压，途中张开再闭合夹爪
pub static MOVE_FORWARD: MovementSequence = MovementSequence {
    name: SequenceName::MoveForward,
    actions: &[
        mv(1, 130.0),
        mv(4, 170.0),
        mv(1, 120.0),
        mv(5, 180.0),
        mv(1, 110.0),
        mv(1, 100.0),
        mv(1, 90.0),
        mv(2, 165.0),
        mv(1, 85.0),
        mv(1, 80.0),
        mv(1, 75.0),
        mv(1, 70.0),
        mv(5, 0.0),
    ],
};

pub static CIRCLE: MovementSequence = MovementSequence {
    name: SequenceName::Circle,
    actions: &[
        mv(1, 130.0),
        mv(4, 130.0),
        mv(1, 130.0),
        mv(1, 145.0),
        mv(2, 180.0),
        mv(0, 180.0),
        mv(5, 180.0),
    ],
};

pub static TRIANGLE: MovementSequence = MovementSequence {
    name: SequenceName::Triangle,
    actions: &[
        mv(1, 110.0),
        mv(4, 130.0),
        mv(1, 130.0),
        mv(1, 145.0),
        mv(1, 180.0),
        mv(2, 180.0),
        mv(4, 70.0),
        mv(5, 0.0),
    ],
};

/// 方形：自带前伸，放置后回到初始姿态
pub static SQUARE: MovementSequence = MovementSequence {
    name: SequenceName::Square,
    actions: &[
        Action::Run(SequenceName::MoveForward),
        mv(1, 110.0),
        mv(4, 130.0),
        mv(1, 130.0),
        mv(1, 145.0),
        mv(2, 180.0),
        mv(0, 0.0),
        mv(5, 0.0),
        Action::Reset,
    ],
};

/// 夹爪张开 → 闭合
pub static PICK_BOX: MovementSequence = MovementSequence {
    name: SequenceName::PickBox,
    actions: &[
        Action::Move(MoveStep::with_dwell(5, 180.0, Duration::from_millis(1500))),
        Action::Move(MoveStep::with_dwell(5, 0.0, Duration::from_secs(1))),
    ],
};

/// 包裹形状
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Circle,
    Triangle,
    Square,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Circle, Shape::Triangle, Shape::Square];

    pub const fn as_str(self) -> &'static str {
        match self {
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
            Shape::Square => "square",
        }
    }

    /// 抓取该形状包裹要依次执行的序列
    pub const fn sequences(self) -> &'static [SequenceName] {
        match self {
            Shape::Circle => &[SequenceName::MoveForward, SequenceName::Circle],
            Shape::Triangle => &[SequenceName::MoveForward, SequenceName::Triangle],
            Shape::Square => &[SequenceName::Square],
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Shape::Circle),
            "triangle" => Ok(Shape::Triangle),
            "square" => Ok(Shape::Square),
            other => Err(MotionError::UnknownShape(other.to_string())),
        }
    }
}
