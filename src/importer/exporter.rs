// ==========================================
// 设备资产管理 - CSV 导出
// ==========================================
// 列顺序固定: asset_tag, serial_no, status, model, brand, department, last_seen
// 写出: csv::Writer，按需加引号
// ==========================================

use crate::domain::{Department, Device};
use crate::importer::error::{ImportError, ImportResult};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::collections::HashMap;

pub const EXPORT_HEADERS: [&str; 7] = [
    "asset_tag",
    "serial_no",
    "status",
    "model",
    "brand",
    "department",
    "last_seen",
];

/// 导出行：设备字段 + 部门显示名
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub asset_tag: String,
    pub serial_no: String,
    pub status: String,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub department: Option<String>,
    pub last_seen: Option<String>,
}

impl ExportRow {
    /// department_id 未知时部门名为空
    pub fn from_device(device: &Device, department_names: &HashMap<i64, String>) -> Self {
        Self {
            asset_tag: device.asset_tag.clone(),
            serial_no: device.serial_no.clone(),
            status: device.status.to_string(),
            model: device.model.clone(),
            brand: device.brand.clone(),
            department: device
                .department_id
                .and_then(|id| department_names.get(&id).cloned()),
            last_seen: device.last_seen.clone(),
        }
    }

    fn fields(&self) -> [Option<&str>; 7] {
        [
            Some(self.asset_tag.as_str()),
            Some(self.serial_no.as_str()),
            Some(self.status.as_str()),
            self.model.as_deref(),
            self.brand.as_deref(),
            self.department.as_deref(),
            self.last_seen.as_deref(),
        ]
    }
}

/// 序列化导出行（表头在首行，行间以 \n 连接，末行无换行）
///
/// 值含逗号、双引号、\r 或 \n 时整体加引号，内部引号加倍
pub fn export_csv(rows: &[ExportRow]) -> ImportResult<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(EXPORT_HEADERS)?;
    for row in rows {
        wtr.write_record(row.fields().iter().map(|field| field.unwrap_or("")))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ImportError::CsvWriteError(e.to_string()))?;
    let mut text =
        String::from_utf8(bytes).map_err(|e| ImportError::CsvWriteError(e.to_string()))?;

    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// 设备列表 + 部门快照 → CSV 文本
pub fn export_devices_csv(devices: &[Device], departments: &[Department]) -> ImportResult<String> {
    let department_names: HashMap<i64, String> = departments
        .iter()
        .map(|d| (d.id, d.name.clone()))
        .collect();

    let rows: Vec<ExportRow> = devices
        .iter()
        .map(|device| ExportRow::from_device(device, &department_names))
        .collect();

    export_csv(&rows)
}
