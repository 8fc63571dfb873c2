// ==========================================
// 设备资产管理 - 运行配置
// ==========================================
// 加载顺序: 默认值 → JSON 配置文件 → 环境变量
// - DEVICE_INVENTORY_CONFIG: JSON 配置文件路径（可选）
// - DEVICE_INVENTORY_DB_PATH: 数据库路径（优先级最高）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "DEVICE_INVENTORY_CONFIG";
pub const DB_PATH_ENV: &str = "DEVICE_INVENTORY_DB_PATH";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },
}

/// 标签打印配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// 每行标签数（A4 网格列数）
    pub columns: u32,
    /// 二维码边长（像素）
    pub code_width_px: u32,
    /// 二维码静区（模块数）
    pub code_margin: u32,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            columns: 3,
            code_width_px: 256,
            code_margin: 1,
        }
    }
}

/// 运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub db_path: String,
    /// 导出文件名
    pub export_file_name: String,
    /// 导入预览行数
    pub preview_rows: usize,
    pub label: LabelConfig,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            export_file_name: "devices.csv".to_string(),
            preview_rows: 20,
            label: LabelConfig::default(),
        }
    }
}

impl InventoryConfig {
    /// 从环境变量加载
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let db_path = std::env::var(DB_PATH_ENV).ok();

        Self::load_from(config_path.as_deref(), db_path)
    }

    /// 显式指定来源加载（便于测试）
    pub fn load_from(
        config_path: Option<&Path>,
        db_path_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };

        if let Some(db_path) = db_path_override {
            let trimmed = db_path.trim();
            if !trimmed.is_empty() {
                config.db_path = trimmed.to_string();
            }
        }

        Ok(config)
    }

    /// 读取 JSON 配置文件（缺省字段使用默认值）
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// 默认数据库路径
///
/// 优先使用用户数据目录，获取失败时回退到当前目录
pub fn default_db_path() -> String {
    let mut path = PathBuf::from("./device_inventory.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("device-inventory");
        // 确保目录存在
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("device_inventory.db");
        }
    }

    path.to_string_lossy().to_string()
}
