// ==========================================
// 设备资产管理 - 配置层
// ==========================================
// 职责: 运行配置加载（JSON 文件 + 环境变量覆写）
// ==========================================

pub mod inventory_config;

pub use inventory_config::{default_db_path, ConfigError, InventoryConfig, LabelConfig};
