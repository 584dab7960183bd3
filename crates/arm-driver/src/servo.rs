//! 舵机索引、角度和 6 舵机数组
//!
//! 提供编译期/运行期检查的舵机索引，防止越界访问。
//!
//! # 示例
//!
//! ```rust
//! use arm_driver::{Deg, ServoArray, ServoId, DEFAULT_POSE};
//!
//! let mut pose: ServoArray<Deg> = DEFAULT_POSE;
//! let wrist = ServoId::new(4).unwrap();
//! pose[wrist] = Deg(130.0);
//! assert_eq!(pose[wrist], Deg(130.0));
//! assert_eq!(pose[ServoId::BASE], Deg(90.0));
//! ```

use std::fmt;
use std::ops::{Index, IndexMut};

/// 舵机数量
pub const SERVO_COUNT: usize = 6;

/// 舵机可接受的最小角度（度）
pub const ANGLE_MIN: f64 = 0.0;

/// 舵机可接受的最大角度（度）
pub const ANGLE_MAX: f64 = 180.0;

/// 初始姿态（度）
///
/// 进程启动时和每次 reset 后的舵机角度。
pub const DEFAULT_POSE: ServoArray<Deg> = ServoArray::new([
    Deg(90.0),
    Deg(180.0),
    Deg(180.0),
    Deg(120.0),
    Deg(0.0),
    Deg(0.0),
]);

/// 舵机索引（0-5）
///
/// 只能通过 [`ServoId::new`]（运行期检查）或 [`ServoId::at`]（const 上下文中编译期检查）构造。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ServoId(u8);

impl ServoId {
    /// 底座旋转
    pub const BASE: Self = ServoId(0);
    /// 夹爪
    pub const GRIPPER: Self = ServoId(5);

    /// 所有舵机，按索引顺序
    pub const ALL: [ServoId; SERVO_COUNT] = [
        ServoId(0),
        ServoId(1),
        ServoId(2),
        ServoId(3),
        ServoId(4),
        ServoId(5),
    ];

    /// 从索引创建舵机 ID（范围检查）
    pub fn new(index: usize) -> Option<Self> {
        (index < SERVO_COUNT).then_some(ServoId(index as u8))
    }

    /// const 构造
    ///
    /// 在 const 上下文中索引越界会直接编译失败，用于静态动作表。
    pub const fn at(index: usize) -> Self {
        assert!(index < SERVO_COUNT, "servo index out of range");
        ServoId(index as u8)
    }

    /// 获取索引（0-5）
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ServoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 角度（度，NewType）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Deg(pub f64);

impl Deg {
    /// 是否在舵机可接受范围内（有限值且 0 ≤ a ≤ 180）
    #[inline]
    pub fn in_range(self) -> bool {
        self.0.is_finite() && (ANGLE_MIN..=ANGLE_MAX).contains(&self.0)
    }
}

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// 6 舵机数组
///
/// 长度固定为 [`SERVO_COUNT`]，以 [`ServoId`] 索引。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ServoArray<T> {
    data: [T; SERVO_COUNT],
}

impl<T: Copy> Copy for ServoArray<T> {}

impl<T> ServoArray<T> {
    #[inline]
    pub const fn new(data: [T; SERVO_COUNT]) -> Self {
        ServoArray { data }
    }

    #[inline]
    pub fn into_array(self) -> [T; SERVO_COUNT] {
        self.data
    }

    /// 映射转换
    pub fn map<U, F>(self, f: F) -> ServoArray<U>
    where
        F: FnMut(T) -> U,
    {
        ServoArray {
            data: self.data.map(f),
        }
    }
}

impl<T> Index<ServoId> for ServoArray<T> {
    type Output = T;

    #[inline]
    fn index(&self, servo: ServoId) -> &Self::Output {
        &self.data[servo.index()]
    }
}

impl<T> IndexMut<ServoId> for ServoArray<T> {
    #[inline]
    fn index_mut(&mut self, servo: ServoId) -> &mut Self::Output {
        &mut self.data[servo.index()]
    }
}

impl<T> From<[T; SERVO_COUNT]> for ServoArray<T> {
    fn from(data: [T; SERVO_COUNT]) -> Self {
        ServoArray { data }
    }
}

impl<T> IntoIterator for ServoArray<T> {
    type Item = T;
    type IntoIter = std::array::IntoIter<T, SERVO_COUNT>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
