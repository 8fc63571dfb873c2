// ==========================================
// 设备资产管理 - 导入导出层
// ==========================================
// 职责: CSV 解析、导入对账、CSV 导出
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod department_resolver;
pub mod device_importer_impl;
pub mod device_importer_trait;
pub mod error;
pub mod exporter;
pub mod field_mapper;
pub mod file_parser;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use department_resolver::{DepartmentLookup, DepartmentResolver, DepartmentStrategy};
pub use device_importer_impl::DeviceImporterImpl;
pub use error::{ImportError, ImportResult};
pub use exporter::{export_csv, export_devices_csv, ExportRow, EXPORT_HEADERS};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{parse_csv, CsvParser, ParsedTable};

// 重导出 Trait 接口
pub use device_importer_trait::{DataCleaner, DeviceImporter, FieldMapper, FileParser, ImportSummary};
