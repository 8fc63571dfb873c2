// ==========================================
// 设备资产管理 - 领域类型定义
// ==========================================
// 职责: 设备状态枚举（含非标准值透传）
// ==========================================

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 设备状态 (Device Status)
// ==========================================
// 序列化格式: snake_case 小写字符串（与数据库一致）
// 非标准值保留原样，由存储层决定是否拒绝
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DeviceStatus {
    #[default]
    Active,   // 在用
    InRepair, // 维修中
    Retired,  // 已报废
    Lost,     // 遗失
    Other(String),
}

impl DeviceStatus {
    /// 所有标准状态
    pub const KNOWN: [DeviceStatus; 4] = [
        DeviceStatus::Active,
        DeviceStatus::InRepair,
        DeviceStatus::Retired,
        DeviceStatus::Lost,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            DeviceStatus::Active => "active",
            DeviceStatus::InRepair => "in_repair",
            DeviceStatus::Retired => "retired",
            DeviceStatus::Lost => "lost",
            DeviceStatus::Other(raw) => raw.as_str(),
        }
    }

    /// 由任意文本构造（小写化后匹配，不匹配则透传）
    pub fn from_raw(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        match lowered.as_str() {
            "active" => DeviceStatus::Active,
            "in_repair" => DeviceStatus::InRepair,
            "retired" => DeviceStatus::Retired,
            "lost" => DeviceStatus::Lost,
            _ => DeviceStatus::Other(lowered),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DeviceStatus::Other(_))
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DeviceStatus::from_raw(s))
    }
}

impl Serialize for DeviceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DeviceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DeviceStatus::from_raw(&raw))
    }
}
