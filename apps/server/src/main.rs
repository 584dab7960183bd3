//! 机械臂控制服务主入口

use anyhow::{Context, Result};
use arm_driver::{DriverKind, NoSettle, ServoDriver, Settle, SpinSettle};
use arm_motion::Arm;
use arm_server::{AppState, ServerConfig, serve};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 6 舵机抓取/放置机械臂 HTTP 控制服务
#[derive(Parser, Debug)]
#[command(name = "arm-server")]
#[command(about = "HTTP/JSON control API for a 6-servo pick-and-place arm", long_about = None)]
struct Cli {
    /// 配置文件路径
    ///
    /// 默认: <config_dir>/servo-arm/server.toml（存在时）
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// 驱动类型：mock 或 hardware
    #[arg(long)]
    driver: Option<DriverKind>,

    /// 监听地址，例如 0.0.0.0:3000
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// 启动时不回到初始姿态
    #[arg(long)]
    no_startup_reset: bool,

    /// 跳过所有 settle 等待（仅用于开发）
    #[arg(long)]
    skip_settle: bool,

    /// 默认日志级别（RUST_LOG 优先）
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 打印生效的配置后退出
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(kind) = self.driver {
            config.driver.kind = kind;
        }
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if self.no_startup_reset {
            config.server.startup_reset = false;
        }
        if self.skip_settle {
            config.driver.skip_settle = true;
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in ["arm_server", "arm_motion", "arm_driver", "tower_http"] {
        filter = filter.add_directive(
            format!("{target}={level}")
                .parse()
                .with_context(|| format!("无效的日志级别: {level}"))?,
        );
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("收到退出信号，正在关闭...");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let (mut config, source) = ServerConfig::resolve(cli.config.as_deref())?;
    cli.apply(&mut config);

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    match &source {
        Some(path) => info!("using config {}", path.display()),
        None => info!("using built-in default config"),
    }

    let settle: Arc<dyn Settle> = if config.driver.skip_settle {
        warn!("settle delays disabled");
        Arc::new(NoSettle)
    } else {
        Arc::new(SpinSettle::new())
    };

    let driver = config
        .driver
        .builder(Arc::clone(&settle))
        .build()
        .context("初始化舵机驱动失败")?;
    info!(driver = driver.name(), "servo driver ready");

    let mut arm = Arm::new(driver, settle);
    if config.server.startup_reset {
        tokio::task::block_in_place(|| arm.reset()).context("启动复位失败")?;
        info!("arm moved to initial position");
    }

    let state = AppState::new(arm);
    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("绑定地址失败: {}", config.server.bind))?;

    serve(listener, state.clone(), shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    state.release().await;
    info!("servo outputs released");
    Ok(())
}
