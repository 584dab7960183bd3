//! HTTP 路由与 handler
//!
//! | 路径 | 方法 | 说明 |
//! |---|---|---|
//! | `/api/servo` | POST | 移动单个舵机 |
//! | `/api/reset`, `/api/initial-position` | POST | 回到初始姿态 |
//! | `/api/pick-package` | POST | 按形状执行抓取/放置 |
//! | `/api/status` | GET | 读取 6 个舵机角度 |
//! | `/api/sequences` | GET | 列出动作目录 |
//! | `/api/sequence` | POST | 执行目录中的任意序列 |

use crate::error::{
    ApiError, INVALID_JSON_BODY, MISSING_SERVO_FIELDS, SEQUENCE_NOT_SPECIFIED,
    SHAPE_NOT_SPECIFIED,
};
use crate::response::{MessageBody, SequenceInfo, SequencesBody, StatusBody};
use crate::state::AppState;
use arm_driver::{Deg, ServoId};
use arm_motion::{SequenceName, Sequencer, Shape};
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::instrument;

/// 构建 API 路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/servo", post(control_servo))
        .route("/api/reset", post(initial_position))
        .route("/api/initial-position", post(initial_position))
        .route("/api/pick-package", post(pick_package))
        .route("/api/status", get(status))
        .route("/api/sequences", get(list_sequences))
        .route("/api/sequence", post(run_sequence))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 请求体必须是 JSON 对象；空请求体视为 `{}`
fn json_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::validation(INVALID_JSON_BODY)),
    }
}

/// 字段存在且不是 `null`
fn present<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| !v.is_null())
}

/// 字段缺失或为 JSON 假值（`null`、`false`、`0`、`""`、`[]`、`{}`）
fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
    }
}

/// 读取名称字段；假值视为未指定，非字符串按 JSON 文本参与后续匹配
fn required_name(
    body: &Map<String, Value>,
    key: &str,
    missing: &'static str,
) -> Result<String, ApiError> {
    match body.get(key) {
        value if is_falsy(value) => Err(ApiError::validation(missing)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(ApiError::validation(missing)),
    }
}

#[instrument(skip_all)]
async fn control_servo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageBody>, ApiError> {
    let body = json_object(&body)?;
    let (Some(servo_id), Some(position)) = (present(&body, "servo_id"), present(&body, "position"))
    else {
        return Err(ApiError::validation(MISSING_SERVO_FIELDS));
    };

    let servo = servo_id
        .as_u64()
        .and_then(|i| usize::try_from(i).ok())
        .and_then(ServoId::new)
        .ok_or_else(|| ApiError::validation(format!("Invalid servo_id {servo_id}")))?;
    let angle = position
        .as_f64()
        .map(Deg)
        .ok_or_else(|| ApiError::validation(format!("Invalid position {position}")))?;

    state.with_arm(move |arm| arm.move_servo(servo, angle)).await?;

    // 原样回显客户端传入的数值（90 不会变成 90.0）
    Ok(Json(MessageBody::new(format!(
        "Servo {servo_id} moved to {position}°"
    ))))
}

#[instrument(skip_all)]
async fn initial_position(State(state): State<AppState>) -> Result<Json<MessageBody>, ApiError> {
    state.with_arm(|arm| arm.reset()).await?;
    Ok(Json(MessageBody::new("Robot returned to initial position")))
}

#[instrument(skip_all)]
async fn pick_package(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageBody>, ApiError> {
    let body = json_object(&body)?;
    let name = required_name(&body, "shape", SHAPE_NOT_SPECIFIED)?;
    let shape: Shape = name.parse()?;

    state.with_arm(move |arm| arm.pick(shape)).await?;
    Ok(Json(MessageBody::new(format!(
        "Successfully picked and placed {name} package"
    ))))
}

#[instrument(skip_all)]
async fn status(State(state): State<AppState>) -> Result<Json<StatusBody>, ApiError> {
    let angles = state.with_arm(|arm| arm.angles()).await?;
    Ok(Json(StatusBody {
        status: "success",
        servo_positions: angles.into_iter().map(|d| d.0).collect(),
    }))
}

async fn list_sequences() -> Json<SequencesBody> {
    let sequences = SequenceName::ALL
        .into_iter()
        .map(|name| SequenceInfo {
            name: name.as_str(),
            steps: Sequencer::plan(name).len(),
        })
        .collect();
    Json(SequencesBody {
        status: "success",
        sequences,
    })
}

#[instrument(skip_all)]
async fn run_sequence(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<MessageBody>, ApiError> {
    let body = json_object(&body)?;
    let name = required_name(&body, "name", SEQUENCE_NOT_SPECIFIED)?;
    let sequence: SequenceName = name.parse()?;

    state.with_arm(move |arm| arm.run(sequence)).await?;
    Ok(Json(MessageBody::new(format!("Sequence {sequence} completed"))))
}
