//! # arm-server
//!
//! 机械臂 HTTP/JSON 控制服务。
//!
//! - [`api`]: 路由与 handler
//! - [`config`]: TOML 配置
//! - [`state`]: 共享机械臂实例（互斥串行化）
//!
//! ```rust,no_run
//! use arm_driver::{MockServoDriver, NoSettle, ServoDriver};
//! use arm_motion::Arm;
//! use arm_server::{AppState, serve};
//! use std::sync::Arc;
//!
//! # async fn run() -> std::io::Result<()> {
//! let driver: Box<dyn ServoDriver> = Box::new(MockServoDriver::new());
//! let arm = Arm::new(driver, Arc::new(NoSettle));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! serve(listener, AppState::new(arm), std::future::pending()).await
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod response;
pub mod state;

pub use api::router;
pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

use std::future::Future;
use tokio::net::TcpListener;
use tracing::info;

/// 在 `listener` 上提供服务，`shutdown` 完成后停止接受新请求并等待进行中的请求结束
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("listening on http://{}", addr);
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
