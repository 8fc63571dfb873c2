// ==========================================
// 设备资产管理 - 数据清洗器实现
// ==========================================
// 职责: NULL 标准化 / 状态标准化 / 日期标准化
// 策略: 无法识别的日期降级为 NULL，不拒绝整行
// ==========================================

use crate::domain::DeviceStatus;
use crate::importer::device_importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn normalize_status(&self, value: Option<&str>) -> DeviceStatus {
        match self.normalize_null(value) {
            Some(raw) => DeviceStatus::from_raw(&raw),
            None => DeviceStatus::Active,
        }
    }

    fn normalize_date(&self, value: Option<&str>) -> Option<String> {
        let value = self.normalize_null(value)?;

        // YYYY-MM-DD: 原样保留
        if matches_digit_shape(&value, "####-##-##") {
            return Some(value);
        }

        // DD-MM-YY → 20YY-MM-DD
        if matches_digit_shape(&value, "##-##-##") {
            let (dd, mm, yy) = (&value[0..2], &value[3..5], &value[6..8]);
            return Some(format!("20{}-{}-{}", yy, mm, dd));
        }

        None
    }
}

/// 按形状匹配：'#' 为 ASCII 数字，其余字符须逐字相等
fn matches_digit_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value
            .bytes()
            .zip(shape.bytes())
            .all(|(v, s)| if s == b'#' { v.is_ascii_digit() } else { v == s })
}
