//! HTTP 层错误类型
//!
//! - 输入校验失败 → 400，固定文案
//! - 驱动/动作失败 → 500，原样返回错误描述
//!
//! 响应体统一为 `{"status": "error", "message": "..."}`。

use crate::response::ErrorBody;
use arm_motion::MotionError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

pub const MISSING_SERVO_FIELDS: &str = "Missing servo_id or position";
pub const SHAPE_NOT_SPECIFIED: &str = "Shape not specified";
pub const INVALID_SHAPE: &str = "Invalid shape specified";
pub const SEQUENCE_NOT_SPECIFIED: &str = "Sequence not specified";
pub const INVALID_SEQUENCE: &str = "Invalid sequence specified";
pub const INVALID_JSON_BODY: &str = "Invalid JSON body";

/// HTTP 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求参数无效
    #[error("{0}")]
    Validation(String),

    /// 驱动或动作执行失败
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// 阻塞任务异常退出
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Motion(MotionError::UnknownShape(_) | MotionError::UnknownSequence(_)) => {
                StatusCode::BAD_REQUEST
            },
            ApiError::Motion(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Motion(MotionError::UnknownShape(_)) => INVALID_SHAPE.to_string(),
            ApiError::Motion(MotionError::UnknownSequence(_)) => INVALID_SEQUENCE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();
        if status.is_server_error() {
            error!(%status, "request failed: {}", message);
        } else {
            warn!(%status, "request rejected: {}", message);
        }
        (status, Json(ErrorBody::new(message))).into_response()
    }
}
