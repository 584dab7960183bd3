//! JSON 响应体

use serde::Serialize;

/// `{"status": "success", "message": "..."}`
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub status: &'static str,
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

/// `{"status": "error", "message": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: &'static str,
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// `GET /api/status`
#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub servo_positions: Vec<f64>,
}

/// 目录中的一个序列
#[derive(Debug, Serialize)]
pub struct SequenceInfo {
    pub name: &'static str,
    /// 展开后的步骤数
    pub steps: usize,
}

/// `GET /api/sequences`
#[derive(Debug, Serialize)]
pub struct SequencesBody {
    pub status: &'static str,
    pub sequences: Vec<SequenceInfo>,
}
