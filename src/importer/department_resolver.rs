// ==========================================
// 设备资产管理 - 部门引用解析
// ==========================================
// 职责: 将导入行中的部门引用解析为有效部门 id
// 优先级（命中即停）:
//   1. department 列按名称匹配（trim + 小写）
//   2. department_id 列按数字 id 匹配（须为已知 id）
//   3. department_id 列按 code 精确匹配
//   4. department_id 列按名称匹配（小写）
//   全部未命中 → None（保留该行）
// ==========================================

use crate::domain::Department;
use std::collections::{HashMap, HashSet};

pub const DEPARTMENT_NAME_COLUMN: &str = "department";
pub const DEPARTMENT_ID_COLUMN: &str = "department_id";

// ==========================================
// DepartmentLookup - 单次导入的部门索引
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DepartmentLookup {
    by_name: HashMap<String, i64>,
    by_code: HashMap<String, i64>,
    valid_ids: HashSet<i64>,
}

impl DepartmentLookup {
    /// 由部门快照构建（同名/同 code 时后者覆盖前者）
    pub fn build(departments: &[Department]) -> Self {
        let mut lookup = Self::default();
        for department in departments {
            lookup
                .by_name
                .insert(department.name.trim().to_lowercase(), department.id);
            if let Some(code) = department.code.as_deref().map(str::trim) {
                if !code.is_empty() {
                    lookup.by_code.insert(code.to_string(), department.id);
                }
            }
            lookup.valid_ids.insert(department.id);
        }
        lookup
    }

    pub fn id_for_name(&self, name: &str) -> Option<i64> {
        self.by_name.get(&name.trim().to_lowercase()).copied()
    }

    pub fn id_for_code(&self, code: &str) -> Option<i64> {
        self.by_code.get(code).copied()
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.valid_ids.contains(&id)
    }
}

// ==========================================
// DepartmentStrategy - 单条解析规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentStrategy {
    NameColumn,     // department 列 → 名称
    IdColumnAsId,   // department_id 列 → 数字 id
    IdColumnAsCode, // department_id 列 → code
    IdColumnAsName, // department_id 列 → 名称
}

impl DepartmentStrategy {
    /// 默认规则链
    pub const DEFAULT_CHAIN: [DepartmentStrategy; 4] = [
        DepartmentStrategy::NameColumn,
        DepartmentStrategy::IdColumnAsId,
        DepartmentStrategy::IdColumnAsCode,
        DepartmentStrategy::IdColumnAsName,
    ];

    pub fn resolve(
        &self,
        row: &HashMap<String, String>,
        lookup: &DepartmentLookup,
    ) -> Option<i64> {
        match self {
            DepartmentStrategy::NameColumn => {
                column_value(row, DEPARTMENT_NAME_COLUMN).and_then(|v| lookup.id_for_name(v))
            }
            DepartmentStrategy::IdColumnAsId => column_value(row, DEPARTMENT_ID_COLUMN)
                .and_then(parse_integral)
                .filter(|id| lookup.contains_id(*id)),
            DepartmentStrategy::IdColumnAsCode => {
                column_value(row, DEPARTMENT_ID_COLUMN).and_then(|v| lookup.id_for_code(v))
            }
            DepartmentStrategy::IdColumnAsName => {
                column_value(row, DEPARTMENT_ID_COLUMN).and_then(|v| lookup.id_for_name(v))
            }
        }
    }
}

/// 取列值（trim 后非空）
fn column_value<'a>(row: &'a HashMap<String, String>, column: &str) -> Option<&'a str> {
    row.get(column).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// 数值解析："7"、"7.0"、"+7" 均视为 7；小数或非有限值不算 id
fn parse_integral(raw: &str) -> Option<i64> {
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        // 超出 i64 范围时 `as` 饱和到 i64::MIN/MAX，不会命中真实部门 id
        Some(value as i64)
    } else {
        None
    }
}

// ==========================================
// DepartmentResolver - 有序规则链
// ==========================================
#[derive(Debug, Clone)]
pub struct DepartmentResolver {
    lookup: DepartmentLookup,
    chain: Vec<DepartmentStrategy>,
}

impl DepartmentResolver {
    pub fn new(departments: &[Department]) -> Self {
        Self::with_chain(departments, DepartmentStrategy::DEFAULT_CHAIN.to_vec())
    }

    pub fn with_chain(departments: &[Department], chain: Vec<DepartmentStrategy>) -> Self {
        Self {
            lookup: DepartmentLookup::build(departments),
            chain,
        }
    }

    /// 依次尝试规则，首个命中即返回
    pub fn resolve(&self, row: &HashMap<String, String>) -> Option<i64> {
        self.chain
            .iter()
            .find_map(|strategy| strategy.resolve(row, &self.lookup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn departments() -> Vec<Department> {
        vec![
            Department::new(1, "IT", Some("10")),
            Department::new(2, "Finance", Some("15")),
            Department::new(3, "Warehouse", None),
        ]
    }

    fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_name_column_beats_invalid_id_column() {
        let resolver = DepartmentResolver::new(&[Department::new(1, "IT", Some("10"))]);
        let r = row(&[("department", "IT"), ("department_id", "99")]);
        assert_eq!(resolver.resolve(&r), Some(1));
    }

    #[test]
    fn test_name_column_case_insensitive() {
        let resolver = DepartmentResolver::new(&departments());
        assert_eq!(resolver.resolve(&row(&[("department", " finance ")])), Some(2));
    }

    #[test]
    fn test_name_column_beats_valid_id_column() {
        let resolver = DepartmentResolver::new(&departments());
        let r = row(&[("department", "Warehouse"), ("department_id", "1")]);
        assert_eq!(resolver.resolve(&r), Some(3));
    }

    #[test]
    fn test_id_column_as_known_id() {
        let resolver = DepartmentResolver::new(&departments());
        assert_eq!(resolver.resolve(&row(&[("department_id", "2")])), Some(2));
        assert_eq!(resolver.resolve(&row(&[("department_id", "3.0")])), Some(3));
    }

    #[test]
    fn test_id_column_falls_back_to_code() {
        // 15 不是有效 id，但是 Finance 的 code
        let resolver = DepartmentResolver::new(&departments());
        assert_eq!(resolver.resolve(&row(&[("department_id", "15")])), Some(2));
    }

    #[test]
    fn test_id_column_id_then_code() {
        // "1" 是有效 id；"10" 不是 id，命中 IT 的 code
        let resolver = DepartmentResolver::new(&departments());
        assert_eq!(resolver.resolve(&row(&[("department_id", "1")])), Some(1));
        assert_eq!(resolver.resolve(&row(&[("department_id", "10")])), Some(1));
    }

    #[test]
    fn test_id_column_falls_back_to_name() {
        let resolver = DepartmentResolver::new(&departments());
        assert_eq!(
            resolver.resolve(&row(&[("department_id", "WAREHOUSE")])),
            Some(3)
        );
    }

    #[test]
    fn test_unmatched_reference_is_none() {
        let resolver = DepartmentResolver::new(&departments());
        assert_eq!(
            resolver.resolve(&row(&[("department", "HR"), ("department_id", "99")])),
            None
        );
        assert_eq!(resolver.resolve(&row(&[("department_id", "")])), None);
        assert_eq!(resolver.resolve(&row(&[])), None);
    }

    #[test]
    fn test_unknown_name_column_falls_through_to_id_column() {
        let resolver = DepartmentResolver::new(&departments());
        let r = row(&[("department", "HR"), ("department_id", "2")]);
        assert_eq!(resolver.resolve(&r), Some(2));
    }

    #[test]
    fn test_custom_chain_order() {
        let resolver = DepartmentResolver::with_chain(
            &departments(),
            vec![DepartmentStrategy::IdColumnAsCode],
        );
        assert_eq!(resolver.resolve(&row(&[("department_id", "2")])), None);
        assert_eq!(resolver.resolve(&row(&[("department_id", "10")])), Some(1));
    }

    #[test]
    fn test_out_of_range_number_matches_nothing() {
        let resolver = DepartmentResolver::new(&departments());
        assert_eq!(resolver.resolve(&row(&[("department_id", "1e300")])), None);
        assert_eq!(resolver.resolve(&row(&[("department_id", "-1e300")])), None);
        assert_eq!(parse_integral("1e300"), Some(i64::MAX));
    }

    #[test]
    fn test_fractional_number_not_an_id() {
        let resolver = DepartmentResolver::new(&departments());
        assert_eq!(resolver.resolve(&row(&[("department_id", "1.5")])), None);
    }
}
