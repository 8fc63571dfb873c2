// ==========================================
// 设备资产管理 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 设备台账的 CSV 导入/导出、维护与标签打印
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - CSV 导入/导出
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 二维码标签
pub mod label;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{Department, Device, DeviceDraft, DeviceFilter, DeviceRecord, DeviceStatus};

// 导入/导出
pub use importer::{DeviceImporter, DeviceImporterImpl, ImportError, ImportSummary, ParsedTable};

// 仓储
pub use repository::{DeviceRepository, DeviceRepositoryImpl, RepositoryError};

// API
pub use api::{ApiError, ApiResult, ImportPreview, InventoryApi};

// 配置
pub use config::InventoryConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备资产管理";
