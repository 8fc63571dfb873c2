// ==========================================
// 设备资产管理 - 字段映射器实现
// ==========================================
// 职责: 源列 → DeviceRecord 字段映射（含列名别名）
// 别名优先级固定，首个存在且非空的值胜出
// ==========================================

use crate::domain::DeviceRecord;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::department_resolver::DepartmentResolver;
use crate::importer::device_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};
use std::collections::HashMap;

pub const ASSET_TAG_COLUMNS: [&str; 3] = ["asset_tag", "Asset Tag", "asset"];
pub const SERIAL_NO_COLUMNS: [&str; 3] = ["serial_no", "Serial", "serial"];

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_to_device_record(
        &self,
        row: &HashMap<String, String>,
        resolver: &DepartmentResolver,
    ) -> DeviceRecord {
        let cleaner = DataCleaner;

        DeviceRecord {
            // 业务主键
            asset_tag: self.get_first(row, &ASSET_TAG_COLUMNS).unwrap_or_default(),
            serial_no: self.get_first(row, &SERIAL_NO_COLUMNS).unwrap_or_default(),

            status: cleaner.normalize_status(self.get_raw(row, "status")),
            model: cleaner.normalize_null(self.get_raw(row, "model")),
            brand: cleaner.normalize_null(self.get_raw(row, "brand")),

            // 部门引用与日期：无法识别则为 None
            department_id: resolver.resolve(row),
            last_seen: cleaner.normalize_date(self.get_raw(row, "last_seen")),
        }
    }
}

impl FieldMapper {
    /// 按别名顺序取第一个非空值
    fn get_first(&self, row: &HashMap<String, String>, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|alias| {
            row.get(*alias)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
    }

    fn get_raw<'a>(&self, row: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
        row.get(key).map(String::as_str)
    }
}
