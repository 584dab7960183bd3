//! 服务配置
//!
//! TOML 配置文件，查找顺序：
//! 1. `--config <path>`
//! 2. `<config_dir>/servo-arm/server.toml`（存在时）
//! 3. 内置默认值

use anyhow::{Context, Result};
use arm_driver::{DriverBuilder, DriverKind, PwmConfig, Settle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// 默认配置文件路径
pub fn default_config_file() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("servo-arm");
    path.push("server.toml");
    Some(path)
}

/// 服务配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: HttpConfig,
    pub driver: DriverConfig,
}

/// HTTP 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 监听地址
    pub bind: SocketAddr,
    /// 启动时先回到初始姿态
    pub startup_reset: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            startup_reset: true,
        }
    }
}

/// 驱动配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub kind: DriverKind,
    /// 单次移动后的 settle（毫秒），缺省使用驱动自己的默认值
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_settle_ms: Option<u64>,
    /// reset 的 settle（毫秒）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_settle_ms: Option<u64>,
    /// 跳过所有等待（仅用于开发）
    pub skip_settle: bool,
    pub pca9685: PwmConfig,
}

impl DriverConfig {
    /// 按配置生成驱动 Builder
    pub fn builder(&self, settle: Arc<dyn Settle>) -> DriverBuilder {
        let mut builder = DriverBuilder::new()
            .kind(self.kind)
            .settle(settle)
            .pwm_config(self.pca9685.clone());
        if let Some(ms) = self.move_settle_ms {
            builder = builder.move_settle(Duration::from_millis(ms));
        }
        if let Some(ms) = self.reset_settle_ms {
            builder = builder.reset_settle(Duration::from_millis(ms));
        }
        builder
    }
}

impl ServerConfig {
    /// 解析 TOML 文本
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("解析配置文件失败")
    }

    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("配置文件无效: {}", path.display()))
    }

    /// 按查找顺序加载配置，返回配置和实际使用的文件
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        match default_config_file() {
            Some(path) if path.exists() => Ok((Self::load(&path)?, Some(path))),
            _ => Ok((Self::default(), None)),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置失败")
    }
}
