// ==========================================
// 设备资产管理 - 部门领域模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 部门（外部维护，导入时只读快照）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub code: Option<String>,
}

impl Department {
    pub fn new(id: i64, name: impl Into<String>, code: Option<&str>) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.map(str::to_string),
        }
    }
}
