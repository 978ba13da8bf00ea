use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::telemetry::recorder::DEFAULT_FPS_WINDOW_MS;

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 主配置结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mqtt: MqttConfig,
    pub session: SessionConfig,
    pub export: ExportConfig,
    pub channels: ChannelConfig,
    pub replay: ReplayConfig,
}

/// MQTT配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub topics: MqttTopics,
    pub keep_alive: u16,
}

/// MQTT主题配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttTopics {
    pub landmarks: String,
    pub control: String,
    /// Retained "offline" is published here as last will.
    pub status: String,
}

/// 会话默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub network_type: String,
    pub resolution: String,
    pub fps_window_ms: f64,
    /// Start a session as soon as the app comes up.
    pub auto_start: bool,
}

/// 导出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: String,
    pub on_shutdown: bool,
}

/// 通道配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub frame_channel_capacity: usize,
    pub control_channel_capacity: usize,
}

/// 回放配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Spacing given to recorded frames that carry no `timestamp_ms`.
    pub frame_interval_ms: f64,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "localhost".to_string(),
            port: 1883,
            client_id: "gesturehub_client".to_string(),
            topics: MqttTopics::default(),
            keep_alive: 5,
        }
    }
}

impl Default for MqttTopics {
    fn default() -> Self {
        Self {
            landmarks: "gesture/landmarks".to_string(),
            control: "gesture/control".to_string(),
            status: "gesture/status".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            network_type: "wifi".to_string(),
            resolution: "640x480".to_string(),
            fps_window_ms: DEFAULT_FPS_WINDOW_MS,
            auto_start: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: "data_export".to_string(),
            on_shutdown: true,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            frame_channel_capacity: 5000,
            control_channel_capacity: 100,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33.3,
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.session.fps_window_ms > 0.0) {
            return Err(ConfigError::ValidationError("FPS window must be positive".to_string()));
        }

        if !(self.replay.frame_interval_ms > 0.0 && self.replay.frame_interval_ms.is_finite()) {
            return Err(ConfigError::ValidationError("Replay frame interval must be positive".to_string()));
        }

        if self.session.network_type.trim().is_empty() || self.session.resolution.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Default network type and resolution must not be empty".to_string(),
            ));
        }

        if self.export.directory.trim().is_empty() {
            return Err(ConfigError::ValidationError("Export directory must not be empty".to_string()));
        }

        // rumqttc 不接受小于5秒的keep alive
        if self.mqtt.keep_alive < 5 {
            return Err(ConfigError::ValidationError("MQTT keep_alive must be at least 5 seconds".to_string()));
        }

        if self.channels.frame_channel_capacity == 0 || self.channels.control_channel_capacity == 0 {
            return Err(ConfigError::ValidationError("Channel capacity must be positive".to_string()));
        }

        Ok(())
    }

    /// 获取导出目录路径
    pub fn get_export_directory(&self) -> PathBuf {
        PathBuf::from(&self.export.directory)
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 配置管理器
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取可变配置
    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

}
