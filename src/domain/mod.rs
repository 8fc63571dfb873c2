// ==========================================
// 设备资产管理 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含导入逻辑
// ==========================================

pub mod department;
pub mod device;
pub mod types;

// 重导出核心类型
pub use department::Department;
pub use device::{Device, DeviceDraft, DeviceFilter, DeviceRecord};
pub use types::DeviceStatus;
