// ==========================================
// 设备资产管理 - 设备导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到外部存储
// 流程: 解析 → 部门快照 → 映射/清洗 → 过滤 → upsert
// 单元: 整批成功或整批失败，无重试、无断点续传
// ==========================================

use crate::domain::{Department, DeviceRecord};
use crate::importer::department_resolver::DepartmentResolver;
use crate::importer::device_importer_trait::{
    DeviceImporter, FieldMapper, FileParser, ImportSummary,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::ParsedTable;
use crate::repository::DeviceRepository;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

// ==========================================
// DeviceImporterImpl - 设备导入器实现
// ==========================================
pub struct DeviceImporterImpl {
    // 外部存储
    repo: Arc<dyn DeviceRepository>,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
}

impl DeviceImporterImpl {
    /// 创建新的 DeviceImporter 实例
    ///
    /// # 参数
    /// - repo: 设备仓储（部门快照 + upsert）
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    pub fn new(
        repo: Arc<dyn DeviceRepository>,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            repo,
            file_parser,
            field_mapper,
        }
    }

    /// 纯对账：行 → 合格 DeviceRecord（保持源顺序）
    pub fn reconcile(&self, table: &ParsedTable, departments: &[Department]) -> Vec<DeviceRecord> {
        let resolver = DepartmentResolver::new(departments);

        table
            .rows
            .iter()
            .map(|row| self.field_mapper.map_to_device_record(row, &resolver))
            .filter(DeviceRecord::is_eligible)
            .collect()
    }
}

#[async_trait]
impl DeviceImporter for DeviceImporterImpl {
    #[instrument(skip(self, file_path), fields(file_path = %file_path.display()))]
    async fn import_from_csv(&self, file_path: &Path) -> ImportResult<ImportSummary> {
        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let table = self.file_parser.parse_file(file_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        info!(total_rows = table.len(), "文件解析完成");

        self.import_table(&table).await
    }

    #[instrument(skip(self, table), fields(total_rows = table.len()))]
    async fn import_table(&self, table: &ParsedTable) -> ImportResult<ImportSummary> {
        // === 步骤 2: 部门快照 ===
        debug!("步骤 2: 读取部门快照");
        let departments = self.repo.list_departments().await?;
        debug!(departments = departments.len(), "部门快照就绪");

        // === 步骤 3: 映射与过滤 ===
        let records = self.reconcile(table, &departments);
        let skipped = table.len() - records.len();
        if skipped > 0 {
            warn!(skipped, "部分行缺少 asset_tag 或 serial_no，已跳过");
        }

        if records.is_empty() {
            warn!("无有效数据行，取消写入");
            return Err(ImportError::NoValidRows);
        }

        // === 步骤 4: 整批 upsert ===
        debug!(batch = records.len(), "步骤 4: 批量 upsert");
        let imported = self.repo.upsert_devices(&records).await.map_err(|e| {
            error!(error = %e, "批量 upsert 失败");
            ImportError::from(e)
        })?;

        info!(imported, skipped, "设备导入完成");
        Ok(ImportSummary {
            total_rows: table.len(),
            imported,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Device, DeviceDraft, DeviceFilter, DeviceStatus};
    use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
    use crate::importer::file_parser::{parse_csv, CsvParser};
    use crate::repository::{RepositoryError, RepositoryResult};
    use std::sync::Mutex;

    /// 记录 upsert 调用的内存仓储
    #[derive(Default)]
    struct RecordingRepository {
        departments: Vec<Department>,
        upserts: Mutex<Vec<Vec<DeviceRecord>>>,
        fail_upsert: bool,
    }

    impl RecordingRepository {
        fn upsert_calls(&self) -> usize {
            self.upserts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DeviceRepository for RecordingRepository {
        async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
            Ok(self.departments.clone())
        }

        async fn insert_department(
            &self,
            _name: &str,
            _code: Option<&str>,
        ) -> RepositoryResult<Department> {
            unimplemented!()
        }

        async fn list_devices(&self, _filter: &DeviceFilter) -> RepositoryResult<Vec<Device>> {
            Ok(Vec::new())
        }

        async fn get_device(&self, _id: &str) -> RepositoryResult<Option<Device>> {
            Ok(None)
        }

        async fn insert_device(&self, _draft: &DeviceDraft) -> RepositoryResult<Device> {
            unimplemented!()
        }

        async fn update_device(&self, _id: &str, _draft: &DeviceDraft) -> RepositoryResult<Device> {
            unimplemented!()
        }

        async fn upsert_devices(&self, records: &[DeviceRecord]) -> RepositoryResult<usize> {
            self.upserts.lock().unwrap().push(records.to_vec());
            if self.fail_upsert {
                return Err(RepositoryError::DatabaseQueryError("connection reset".to_string()));
            }
            Ok(records.len())
        }

        async fn soft_delete_devices(&self, _ids: &[String]) -> RepositoryResult<usize> {
            Ok(0)
        }
    }

    fn importer(repo: Arc<RecordingRepository>) -> DeviceImporterImpl {
        DeviceImporterImpl::new(repo, Box::new(CsvParser), Box::new(FieldMapperImpl))
    }

    #[tokio::test]
    async fn test_minimal_round_trip() {
        let repo = Arc::new(RecordingRepository::default());
        let table = parse_csv("asset_tag,serial_no\nA1,S1\n");

        let summary = importer(repo.clone()).import_table(&table).await.unwrap();
        assert_eq!(summary.imported, 1);

        let batch = repo.upserts.lock().unwrap()[0].clone();
        assert_eq!(
            batch,
            vec![DeviceRecord {
                asset_tag: "A1".to_string(),
                serial_no: "S1".to_string(),
                status: DeviceStatus::Active,
                model: None,
                brand: None,
                department_id: None,
                last_seen: None,
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_batch_rejected_without_upsert() {
        let repo = Arc::new(RecordingRepository::default());
        let table = parse_csv("asset_tag,serial_no,model\nA1,,X\n,S2,Y\n");

        let result = importer(repo.clone()).import_table(&table).await;
        assert!(matches!(result, Err(ImportError::NoValidRows)));
        assert_eq!(repo.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn test_header_only_table_rejected() {
        let repo = Arc::new(RecordingRepository::default());
        let table = parse_csv("asset_tag,serial_no\n");

        let result = importer(repo.clone()).import_table(&table).await;
        assert!(matches!(result, Err(ImportError::NoValidRows)));
        assert_eq!(repo.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_rows_skipped() {
        let repo = Arc::new(RecordingRepository::default());
        let table = parse_csv("asset_tag,serial_no\nA1,S1\nA2,\nA3,S3\n");

        let summary = importer(repo.clone()).import_table(&table).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                total_rows: 3,
                imported: 2,
                skipped: 1
            }
        );

        let batch = repo.upserts.lock().unwrap()[0].clone();
        let tags: Vec<&str> = batch.iter().map(|r| r.asset_tag.as_str()).collect();
        assert_eq!(tags, vec!["A1", "A3"]);
    }

    #[tokio::test]
    async fn test_department_and_date_degrade_to_null() {
        let repo = Arc::new(RecordingRepository {
            departments: vec![Department::new(1, "IT", Some("10"))],
            ..Default::default()
        });
        let table = parse_csv(
            "asset_tag,serial_no,department,department_id,last_seen\n\
             A1,S1,IT,99,01-02-23\n\
             A2,S2,HR,42,not-a-date\n",
        );

        importer(repo.clone()).import_table(&table).await.unwrap();

        let batch = repo.upserts.lock().unwrap()[0].clone();
        assert_eq!(batch[0].department_id, Some(1));
        assert_eq!(batch[0].last_seen.as_deref(), Some("2023-02-01"));
        assert_eq!(batch[1].department_id, None);
        assert_eq!(batch[1].last_seen, None);
    }

    #[tokio::test]
    async fn test_upsert_failure_propagated() {
        let repo = Arc::new(RecordingRepository {
            fail_upsert: true,
            ..Default::default()
        });
        let table = parse_csv("asset_tag,serial_no\nA1,S1\n");

        let result = importer(repo.clone()).import_table(&table).await;
        match result {
            Err(ImportError::Repository(e)) => assert!(e.to_string().contains("connection reset")),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(repo.upsert_calls(), 1);
    }
}
