// ==========================================
// 设备资产管理 - 设备台账 API
// ==========================================
// 职责: 封装界面所需的全部设备操作
// - 列表/筛选、新增、编辑、软删除
// - CSV 导入预览与提交、CSV 导出
// - 二维码标签请求
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::InventoryConfig;
use crate::domain::{Department, Device, DeviceDraft, DeviceFilter, DeviceStatus};
use crate::importer::{
    export_devices_csv, CsvParser, DeviceImporter, DeviceImporterImpl, FieldMapperImpl,
    FileParser, ImportSummary, ParsedTable,
};
use crate::label::{build_label_request, render_print_sheet, CodeEncoder, LabelRequest};
use crate::repository::DeviceRepository;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// 导入预览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPreview {
    pub headers: Vec<String>,
    /// 前 N 行（N = preview_rows）
    pub rows: Vec<HashMap<String, String>>,
    /// 解析出的总行数
    pub total_rows: usize,
}

/// 设备台账 API
pub struct InventoryApi {
    repo: Arc<dyn DeviceRepository>,
    importer: DeviceImporterImpl,
    parser: CsvParser,
    config: InventoryConfig,
}

impl InventoryApi {
    /// 创建新的 InventoryApi 实例
    pub fn new(repo: Arc<dyn DeviceRepository>, config: InventoryConfig) -> Self {
        let importer = DeviceImporterImpl::new(
            repo.clone(),
            Box::new(CsvParser),
            Box::new(FieldMapperImpl),
        );
        Self {
            repo,
            importer,
            parser: CsvParser,
            config,
        }
    }

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    // ==========================================
    // 部门
    // ==========================================

    /// 部门列表（按名称排序）
    pub async fn list_departments(&self) -> ApiResult<Vec<Department>> {
        Ok(self.repo.list_departments().await?)
    }

    /// 新增部门
    pub async fn add_department(&self, name: &str, code: Option<&str>) -> ApiResult<Department> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::InvalidInput("部门名称不能为空".to_string()));
        }
        let code = code.map(str::trim).filter(|c| !c.is_empty());
        Ok(self.repo.insert_department(name, code).await?)
    }

    // ==========================================
    // 设备 CRUD
    // ==========================================

    /// 设备列表（未删除，按 asset_tag 排序）
    pub async fn list_devices(&self, filter: &DeviceFilter) -> ApiResult<Vec<Device>> {
        Ok(self.repo.list_devices(filter).await?)
    }

    /// 新增设备
    #[instrument(skip(self, draft), fields(asset_tag = %draft.asset_tag))]
    pub async fn create_device(&self, draft: DeviceDraft) -> ApiResult<Device> {
        let draft = Self::validate_draft(draft)?;
        let device = self.repo.insert_device(&draft).await?;
        info!(id = %device.id, "新增设备");
        Ok(device)
    }

    /// 编辑设备
    #[instrument(skip(self, draft), fields(asset_tag = %draft.asset_tag))]
    pub async fn update_device(&self, id: &str, draft: DeviceDraft) -> ApiResult<Device> {
        let draft = Self::validate_draft(draft)?;
        let device = self.repo.update_device(id, &draft).await?;
        info!(id = %device.id, "更新设备");
        Ok(device)
    }

    /// 软删除选中设备；空选择不做任何操作
    pub async fn soft_delete_devices(&self, ids: &[String]) -> ApiResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let affected = self.repo.soft_delete_devices(ids).await?;
        info!(requested = ids.len(), affected, "软删除设备");
        Ok(affected)
    }

    fn validate_draft(draft: DeviceDraft) -> ApiResult<DeviceDraft> {
        let draft = draft.normalized();
        if draft.asset_tag.is_empty() || draft.serial_no.is_empty() {
            return Err(ApiError::InvalidInput(
                "必须填写资产编号(asset_tag)与序列号(serial_no)".to_string(),
            ));
        }
        if !draft.status.is_known() {
            let allowed: Vec<String> = DeviceStatus::KNOWN.iter().map(|s| s.to_string()).collect();
            return Err(ApiError::InvalidInput(format!(
                "无效的设备状态: {}（可选: {}）",
                draft.status,
                allowed.join(", ")
            )));
        }
        Ok(draft)
    }

    // ==========================================
    // 导入
    // ==========================================

    /// 解析文本并生成预览
    pub fn preview_import_text(&self, text: &str) -> (ParsedTable, ImportPreview) {
        let table = self.parser.parse_text(text);
        let preview = self.build_preview(&table);
        (table, preview)
    }

    /// 读取文件并生成预览
    pub fn preview_import_file(&self, path: &Path) -> ApiResult<(ParsedTable, ImportPreview)> {
        let table = self.parser.parse_file(path)?;
        let preview = self.build_preview(&table);
        Ok((table, preview))
    }

    fn build_preview(&self, table: &ParsedTable) -> ImportPreview {
        ImportPreview {
            headers: table.headers.clone(),
            rows: table
                .rows
                .iter()
                .take(self.config.preview_rows)
                .cloned()
                .collect(),
            total_rows: table.len(),
        }
    }

    /// 提交已预览的表
    pub async fn commit_import(&self, table: &ParsedTable) -> ApiResult<ImportSummary> {
        Ok(self.importer.import_table(table).await?)
    }

    /// 直接从文件导入
    pub async fn import_file(&self, path: &Path) -> ApiResult<ImportSummary> {
        Ok(self.importer.import_from_csv(path).await?)
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 按当前筛选条件导出 CSV 文本
    pub async fn export_csv(&self, filter: &DeviceFilter) -> ApiResult<String> {
        let departments = self.repo.list_departments().await?;
        let devices = self.repo.list_devices(filter).await?;
        Ok(export_devices_csv(&devices, &departments)?)
    }

    /// 导出到目录下的 devices.csv（文件名取自配置）
    pub async fn export_to_file(&self, filter: &DeviceFilter, dir: &Path) -> ApiResult<PathBuf> {
        let csv = self.export_csv(filter).await?;
        let path = dir.join(&self.config.export_file_name);
        fs::write(&path, csv).map_err(|e| {
            ApiError::ExportError(format!("写入 {} 失败: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "导出完成");
        Ok(path)
    }

    // ==========================================
    // 标签
    // ==========================================

    /// 选中设备的标签请求；无选中返回 None
    pub async fn label_request(
        &self,
        filter: &DeviceFilter,
        selected_ids: &[String],
    ) -> ApiResult<Option<LabelRequest>> {
        if selected_ids.is_empty() {
            return Ok(None);
        }
        let devices = self.repo.list_devices(filter).await?;
        Ok(build_label_request(
            &devices,
            selected_ids,
            &self.config.label,
        ))
    }

    /// 选中设备的 A4 标签打印页（列数取自配置）；无选中返回 None
    pub async fn label_sheet(
        &self,
        filter: &DeviceFilter,
        selected_ids: &[String],
        encoder: &dyn CodeEncoder,
    ) -> ApiResult<Option<String>> {
        let Some(request) = self.label_request(filter, selected_ids).await? else {
            return Ok(None);
        };
        let html = render_print_sheet(&request, encoder, self.config.label.columns)?;
        info!(labels = request.items.len(), "生成标签打印页");
        Ok(Some(html))
    }
}
