// ==========================================
// 设备资产管理 - 设备领域模型
// ==========================================
// 职责: 设备台账实体、导入导出结构、表单与查询条件
// 业务主键: asset_tag（导入 upsert 冲突键）
// ==========================================

use crate::domain::types::DeviceStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Device - 设备台账记录（存储形态）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String, // 代理主键（UUID v4）

    pub asset_tag: String, // 资产编号（业务主键，唯一）
    pub serial_no: String, // 序列号

    pub device_type_id: Option<i64>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub status: DeviceStatus,
    pub last_seen: Option<String>, // ISO 日期 YYYY-MM-DD
    pub department_id: Option<i64>,

    // 软删除时间戳，NULL 表示有效
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Device {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

// ==========================================
// DeviceRecord - 导入/导出形态
// ==========================================
// 入库前提: asset_tag 与 serial_no 均非空
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub asset_tag: String,
    pub serial_no: String,
    pub status: DeviceStatus,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub department_id: Option<i64>,
    pub last_seen: Option<String>,
}

impl DeviceRecord {
    /// 是否满足入库条件
    pub fn is_eligible(&self) -> bool {
        !self.asset_tag.is_empty() && !self.serial_no.is_empty()
    }
}

// ==========================================
// DeviceDraft - 新增/编辑表单
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceDraft {
    pub asset_tag: String,
    pub serial_no: String,
    #[serde(default)]
    pub status: DeviceStatus,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub department_id: Option<i64>,
}

impl DeviceDraft {
    /// 空白 model/brand 统一为 None
    pub fn normalized(mut self) -> Self {
        self.asset_tag = self.asset_tag.trim().to_string();
        self.serial_no = self.serial_no.trim().to_string();
        self.model = self.model.filter(|v| !v.trim().is_empty());
        self.brand = self.brand.filter(|v| !v.trim().is_empty());
        self
    }
}

impl From<&Device> for DeviceDraft {
    fn from(device: &Device) -> Self {
        Self {
            asset_tag: device.asset_tag.clone(),
            serial_no: device.serial_no.clone(),
            status: device.status.clone(),
            model: device.model.clone(),
            brand: device.brand.clone(),
            department_id: device.department_id,
        }
    }
}

// ==========================================
// DeviceFilter - 列表查询条件
// ==========================================
// search: 对 asset_tag / serial_no / model 做不区分大小写的包含匹配
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceFilter {
    #[serde(default)]
    pub search: String,
    pub status: Option<DeviceStatus>,
    pub department_id: Option<i64>,
}

impl DeviceFilter {
    pub fn search_term(&self) -> Option<&str> {
        let trimmed = self.search.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}
