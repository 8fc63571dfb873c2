// ==========================================
// 设备资产管理 - 设备数据仓储 Trait
// ==========================================
// 职责: 定义外部数据存储协作者接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{Department, Device, DeviceDraft, DeviceFilter, DeviceRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// DeviceRepository Trait
// ==========================================
// 用途: 部门读取、设备查询/写入、批量 upsert
// 实现者: DeviceRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    // ===== 部门 =====

    /// 查询全部部门（按名称排序）
    async fn list_departments(&self) -> RepositoryResult<Vec<Department>>;

    /// 新增部门
    async fn insert_department(&self, name: &str, code: Option<&str>)
        -> RepositoryResult<Department>;

    // ===== 设备查询 =====

    /// 按条件查询未删除设备（按 asset_tag 排序）
    async fn list_devices(&self, filter: &DeviceFilter) -> RepositoryResult<Vec<Device>>;

    /// 按 id 查询设备（含已软删除记录）
    async fn get_device(&self, id: &str) -> RepositoryResult<Option<Device>>;

    // ===== 设备写入 =====

    /// 新增设备
    ///
    /// # 返回
    /// - Ok(Device): 新记录（id 由仓储生成）
    /// - Err(UniqueConstraintViolation): asset_tag 已存在
    async fn insert_device(&self, draft: &DeviceDraft) -> RepositoryResult<Device>;

    /// 按 id 更新设备
    ///
    /// # 返回
    /// - Err(NotFound): id 不存在
    async fn update_device(&self, id: &str, draft: &DeviceDraft) -> RepositoryResult<Device>;

    /// 批量 upsert（冲突键 asset_tag，存在则更新，不存在则插入）
    ///
    /// 整批作为一个单元，失败时不保留任何部分写入
    async fn upsert_devices(&self, records: &[DeviceRecord]) -> RepositoryResult<usize>;

    /// 软删除（写入 deleted_at）
    async fn soft_delete_devices(&self, ids: &[String]) -> RepositoryResult<usize>;
}
