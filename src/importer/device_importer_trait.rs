// ==========================================
// 设备资产管理 - 设备导入 Trait
// ==========================================
// 职责: 定义设备导入接口（不包含实现）
// 导入管道: 解析 → 部门快照 → 字段映射/清洗 → 过滤 → upsert
// ==========================================

use crate::domain::{DeviceRecord, DeviceStatus};
use crate::importer::department_resolver::DepartmentResolver;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::ParsedTable;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 导入结果汇总
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// 解析出的数据行数（已去除全空行）
    pub total_rows: usize,
    /// 提交 upsert 的记录数
    pub imported: usize,
    /// 因缺少 asset_tag / serial_no 被跳过的行数
    pub skipped: usize,
}

// ==========================================
// DeviceImporter Trait
// ==========================================
// 用途: 设备导入主接口
// 实现者: DeviceImporterImpl
#[async_trait]
pub trait DeviceImporter: Send + Sync {
    /// 从 CSV 文件导入设备
    ///
    /// # 返回
    /// - Ok(ImportSummary): 导入汇总
    /// - Err: 文件读取错误、无有效行、存储错误
    async fn import_from_csv(&self, file_path: &Path) -> ImportResult<ImportSummary>;

    /// 导入已解析（已预览）的表
    ///
    /// # 流程
    /// 1. 读取部门快照（须在对账前完成）
    /// 2. 逐行映射为 DeviceRecord
    /// 3. 过滤缺少业务主键的记录
    /// 4. 空批次 → ImportError::NoValidRows，不调用 upsert
    /// 5. 整批 upsert（冲突键 asset_tag）
    async fn import_table(&self, table: &ParsedTable) -> ImportResult<ImportSummary>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文本/文件解析接口
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文本（宽松，不报错）
    fn parse_text(&self, text: &str) -> ParsedTable;

    /// 读取文件并解析
    ///
    /// # 返回
    /// - Err: 文件不存在、扩展名不支持、读取失败
    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 行记录 → DeviceRecord
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将一行映射为 DeviceRecord（不做过滤，可能返回不合格记录）
    fn map_to_device_record(
        &self,
        row: &HashMap<String, String>,
        resolver: &DepartmentResolver,
    ) -> DeviceRecord;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单字段标准化
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 空字符串/空白 → None，其余 trim
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 缺失/空 → active；其余小写化后透传
    fn normalize_status(&self, value: Option<&str>) -> DeviceStatus;

    /// YYYY-MM-DD 原样；DD-MM-YY → 20YY-MM-DD；其余 → None
    fn normalize_date(&self, value: Option<&str>) -> Option<String>;
}
