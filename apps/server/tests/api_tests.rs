//! HTTP API 端到端测试（mock 驱动，无 settle 等待）

use arm_driver::{
    Deg, DriverError, MockCommand, MockServoDriver, NoSettle, ServoArray, ServoDriver, ServoId,
    SpinSettle,
};
use arm_motion::{Arm, Leaf, SequenceName, Sequencer};
use arm_server::{AppState, router};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const DEFAULT_POSE: [f64; 6] = [90.0, 180.0, 180.0, 120.0, 0.0, 0.0];

fn mock_driver() -> MockServoDriver {
    MockServoDriver::with_settle(Arc::new(NoSettle))
}

fn app_with(driver: MockServoDriver) -> Router {
    let driver: Box<dyn ServoDriver> = Box::new(driver);
    router(AppState::new(Arm::new(driver, Arc::new(NoSettle))))
}

fn app() -> Router {
    app_with(mock_driver())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(&body.to_string())).await
}

async fn positions(app: &Router) -> Value {
    let (status, body) = send(app, Method::GET, "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    body["servo_positions"].clone()
}

fn success(message: &str) -> Value {
    json!({ "status": "success", "message": message })
}

fn error(message: &str) -> Value {
    json!({ "status": "error", "message": message })
}

#[tokio::test]
async fn test_status_starts_in_default_pose() {
    let app = app();
    assert_eq!(positions(&app).await, json!(DEFAULT_POSE));
}

#[tokio::test]
async fn test_move_servo() {
    let app = app();

    let (status, body) = post(&app, "/api/servo", json!({ "servo_id": 0, "position": 45 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success("Servo 0 moved to 45°"));

    let (status, body) = post(&app, "/api/servo", json!({ "servo_id": 3, "position": 12.5 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success("Servo 3 moved to 12.5°"));

    assert_eq!(
        positions(&app).await,
        json!([45.0, 180.0, 180.0, 12.5, 0.0, 0.0])
    );
}

#[tokio::test]
async fn test_move_servo_missing_fields() {
    let app = app();
    for body in [
        json!({}),
        json!({ "servo_id": 0 }),
        json!({ "position": 90 }),
        json!({ "servo_id": null, "position": 90 }),
    ] {
        let (status, resp) = post(&app, "/api/servo", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp, error("Missing servo_id or position"));
    }

    // 空请求体等同于 {}
    let (status, resp) = send(&app, Method::POST, "/api/servo", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, error("Missing servo_id or position"));
}

#[tokio::test]
async fn test_move_servo_invalid_values() {
    let app = app();

    let (status, resp) = post(&app, "/api/servo", json!({ "servo_id": 6, "position": 90 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, error("Invalid servo_id 6"));

    let (status, resp) = post(&app, "/api/servo", json!({ "servo_id": -1, "position": 90 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, error("Invalid servo_id -1"));

    let (status, resp) =
        post(&app, "/api/servo", json!({ "servo_id": 1, "position": "up" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, error("Invalid position \"up\""));

    // 超出角度范围是驱动错误
    let (status, resp) = post(&app, "/api/servo", json!({ "servo_id": 1, "position": 200 })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp, error("Angle out of range: 200"));

    // 状态不变
    assert_eq!(positions(&app).await, json!(DEFAULT_POSE));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let app = app();
    for uri in ["/api/servo", "/api/pick-package", "/api/sequence"] {
        let (status, resp) = send(&app, Method::POST, uri, Some("[1, 2]")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp, error("Invalid JSON body"));

        let (status, resp) = send(&app, Method::POST, uri, Some("{\"shape\":")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp, error("Invalid JSON body"));
    }
}

#[tokio::test]
async fn test_reset_routes() {
    let app = app();
    for uri in ["/api/reset", "/api/initial-position"] {
        post(&app, "/api/servo", json!({ "servo_id": 2, "position": 10 })).await;

        let (status, body) = send(&app, Method::POST, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, success("Robot returned to initial position"));
        assert_eq!(positions(&app).await, json!(DEFAULT_POSE));

        // 重复 reset 结果相同
        let (status, _) = send(&app, Method::POST, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(positions(&app).await, json!(DEFAULT_POSE));
    }
}

#[tokio::test]
async fn test_pick_circle() {
    let app = app();
    let (status, body) = post(&app, "/api/pick-package", json!({ "shape": "circle" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success("Successfully picked and placed circle package"));
    assert_eq!(
        positions(&app).await,
        json!([180.0, 145.0, 180.0, 120.0, 130.0, 180.0])
    );
}

#[tokio::test]
async fn test_pick_triangle() {
    let app = app();
    let (status, body) = post(&app, "/api/pick-package", json!({ "shape": "triangle" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success("Successfully picked and placed triangle package"));
    assert_eq!(
        positions(&app).await,
        json!([90.0, 180.0, 180.0, 120.0, 70.0, 0.0])
    );
}

#[tokio::test]
async fn test_pick_square_returns_home() {
    let app = app();
    post(&app, "/api/servo", json!({ "servo_id": 3, "position": 10 })).await;

    let (status, body) = post(&app, "/api/pick-package", json!({ "shape": "square" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success("Successfully picked and placed square package"));
    assert_eq!(positions(&app).await, json!(DEFAULT_POSE));
}

#[tokio::test]
async fn test_pick_shape_validation() {
    let app = app();

    for body in [json!({}), json!({ "shape": "" }), json!({ "shape": null })] {
        let (status, resp) = post(&app, "/api/pick-package", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp, error("Shape not specified"));
    }

    for shape in ["hexagon", "Circle", "circle_movement"] {
        let (status, resp) = post(&app, "/api/pick-package", json!({ "shape": shape })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp, error("Invalid shape specified"));
    }

    // 没有任何舵机动作
    assert_eq!(positions(&app).await, json!(DEFAULT_POSE));
}

#[tokio::test]
async fn test_pick_driver_fault_keeps_partial_state() {
    let mut driver = mock_driver();
    // move_forward 13 步成功，circle 只完成前两步
    driver.fail_after(13 + 2);
    let app = app_with(driver);

    let (status, resp) = post(&app, "/api/pick-package", json!({ "shape": "circle" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        resp,
        error("Bus error: simulated bus fault (at circle_movement step 2)")
    );

    // 不回滚
    assert_eq!(
        positions(&app).await,
        json!([90.0, 130.0, 165.0, 120.0, 130.0, 0.0])
    );

    // 故障持续，reset 同样失败
    let (status, resp) = send(&app, Method::POST, "/api/reset", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp, error("Bus error: simulated bus fault"));
}

#[tokio::test]
async fn test_list_sequences() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/sequences", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "sequences": [
                { "name": "initial_position", "steps": 1 },
                { "name": "move_forward", "steps": 13 },
                { "name": "circle_movement", "steps": 7 },
                { "name": "triangle_movement", "steps": 8 },
                { "name": "square_movement", "steps": 21 },
                { "name": "pick_box", "steps": 2 },
            ]
        })
    );
}

#[tokio::test]
async fn test_run_sequence() {
    let app = app();

    let (status, body) = post(&app, "/api/sequence", json!({ "name": "pick_box" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success("Sequence pick_box completed"));
    // 夹爪最后闭合
    assert_eq!(positions(&app).await[5], json!(0.0));

    // 别名
    let (status, body) = post(&app, "/api/sequence", json!({ "name": "circle" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success("Sequence circle_movement completed"));

    let (status, body) = post(&app, "/api/sequence", json!({ "name": "initial_position" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, success("Sequence initial_position completed"));
    assert_eq!(positions(&app).await, json!(DEFAULT_POSE));
}

#[tokio::test]
async fn test_run_sequence_validation() {
    let app = app();

    let (status, resp) = post(&app, "/api/sequence", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp, error("Sequence not specified"));

    for name in [json!("spiral"), json!(3)] {
        let (status, resp) = post(&app, "/api/sequence", json!({ "name": name })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp, error("Invalid sequence specified"));
    }
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/status")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_wrong_method_and_unknown_route() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/api/servo", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&app, Method::POST, "/api/conveyor", Some("{}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// 把驱动收到的指令写入共享日志，供 router 外部断言
struct SharedLog {
    inner: MockServoDriver,
    log: Arc<Mutex<Vec<MockCommand>>>,
}

impl ServoDriver for SharedLog {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn set_angle(&mut self, servo: ServoId, angle: Deg) -> Result<(), DriverError> {
        self.inner.set_angle(servo, angle)?;
        self.log.lock().push(MockCommand::Move(servo, angle));
        Ok(())
    }

    fn reset(&mut self) -> Result<(), DriverError> {
        self.inner.reset()?;
        self.log.lock().push(MockCommand::Reset);
        Ok(())
    }

    fn read_angles(&mut self) -> Result<ServoArray<Deg>, DriverError> {
        self.inner.read_angles()
    }
}

fn expected_commands(names: &[SequenceName]) -> Vec<MockCommand> {
    names
        .iter()
        .flat_map(|&name| Sequencer::plan(name))
        .map(|leaf| match leaf {
            Leaf::Move(step) => MockCommand::Move(step.servo, step.angle),
            Leaf::Reset => MockCommand::Reset,
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_picks_do_not_interleave() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let driver = SharedLog {
        inner: MockServoDriver::with_settle(Arc::new(SpinSettle::new()))
            .move_settle(Duration::from_millis(2)),
        log: log.clone(),
    };
    let driver: Box<dyn ServoDriver> = Box::new(driver);
    let app = router(AppState::new(Arm::new(driver, Arc::new(NoSettle))));

    let (circle, triangle) = tokio::join!(
        post(&app, "/api/pick-package", json!({ "shape": "circle" })),
        post(&app, "/api/pick-package", json!({ "shape": "triangle" })),
    );
    assert_eq!(circle.0, StatusCode::OK);
    assert_eq!(triangle.0, StatusCode::OK);

    let circle = expected_commands(&[SequenceName::MoveForward, SequenceName::Circle]);
    let triangle = expected_commands(&[SequenceName::MoveForward, SequenceName::Triangle]);
    assert_eq!(circle.len(), 20);
    assert_eq!(triangle.len(), 21);

    let history = log.lock().clone();
    let circle_first: Vec<_> = circle.iter().chain(&triangle).copied().collect();
    let triangle_first: Vec<_> = triangle.iter().chain(&circle).copied().collect();
    assert!(
        history == circle_first || history == triangle_first,
        "commands from the two picks interleaved: {:?}",
        history
    );
}
