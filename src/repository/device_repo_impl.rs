// ==========================================
// 设备资产管理 - 设备数据仓储实现
// ==========================================
// 职责: 实现 DeviceRepository（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::{Department, Device, DeviceDraft, DeviceFilter, DeviceRecord, DeviceStatus};
use crate::repository::device_repo::DeviceRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

const DEVICE_COLUMNS: &str = "id, asset_tag, serial_no, device_type_id, model, brand, status, last_seen, department_id, deleted_at";

fn map_device_row(row: &Row<'_>) -> rusqlite::Result<Device> {
    let status: String = row.get(6)?;
    Ok(Device {
        id: row.get(0)?,
        asset_tag: row.get(1)?,
        serial_no: row.get(2)?,
        device_type_id: row.get(3)?,
        model: row.get(4)?,
        brand: row.get(5)?,
        status: DeviceStatus::from_raw(&status),
        last_seen: row.get(7)?,
        department_id: row.get(8)?,
        deleted_at: row.get(9)?,
    })
}

fn map_department_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
    })
}

// ==========================================
// DeviceRepositoryImpl
// ==========================================
pub struct DeviceRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl DeviceRepositoryImpl {
    /// 打开数据库并确保 schema 存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path).map_err(|e| {
            RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e))
        })?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 与建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn find_device(conn: &Connection, id: &str) -> RepositoryResult<Option<Device>> {
        let sql = format!("SELECT {} FROM devices WHERE id = ?1", DEVICE_COLUMNS);
        let device = conn
            .query_row(&sql, params![id], map_device_row)
            .optional()?;
        Ok(device)
    }

    /// 在事务中批量 upsert
    fn upsert_devices_tx(tx: &Transaction, records: &[DeviceRecord]) -> RepositoryResult<usize> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO devices (
                id, asset_tag, serial_no, status, model, brand, department_id, last_seen
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(asset_tag) DO UPDATE SET
                serial_no = excluded.serial_no,
                status = excluded.status,
                model = excluded.model,
                brand = excluded.brand,
                department_id = excluded.department_id,
                last_seen = excluded.last_seen
            "#,
        )?;

        let mut count = 0;
        for record in records {
            stmt.execute(params![
                Uuid::new_v4().to_string(),
                record.asset_tag,
                record.serial_no,
                record.status.as_str(),
                record.model,
                record.brand,
                record.department_id,
                record.last_seen,
            ])?;
            count += 1;
        }

        Ok(count)
    }
}

#[async_trait]
impl DeviceRepository for DeviceRepositoryImpl {
    async fn list_departments(&self) -> RepositoryResult<Vec<Department>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name, code FROM departments ORDER BY name")?;
        let departments = stmt
            .query_map([], map_department_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(departments)
    }

    async fn insert_department(
        &self,
        name: &str,
        code: Option<&str>,
    ) -> RepositoryResult<Department> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO departments (name, code) VALUES (?1, ?2)",
            params![name, code],
        )?;
        Ok(Department {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            code: code.map(str::to_string),
        })
    }

    async fn list_devices(&self, filter: &DeviceFilter) -> RepositoryResult<Vec<Device>> {
        let mut sql = format!(
            "SELECT {} FROM devices WHERE deleted_at IS NULL",
            DEVICE_COLUMNS
        );
        let mut args: Vec<Value> = Vec::new();

        if let Some(status) = &filter.status {
            sql.push_str(" AND status = ?");
            args.push(Value::Text(status.to_string()));
        }
        if let Some(department_id) = filter.department_id {
            sql.push_str(" AND department_id = ?");
            args.push(Value::Integer(department_id));
        }
        if let Some(term) = filter.search_term() {
            let pattern = format!("%{}%", term.to_lowercase());
            sql.push_str(
                " AND (lower(asset_tag) LIKE ? OR lower(serial_no) LIKE ? OR lower(COALESCE(model, '')) LIKE ?)",
            );
            for _ in 0..3 {
                args.push(Value::Text(pattern.clone()));
            }
        }
        sql.push_str(" ORDER BY asset_tag");

        debug!(sql = %sql, "查询设备列表");

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let devices = stmt
            .query_map(params_from_iter(args.iter()), map_device_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(devices)
    }

    async fn get_device(&self, id: &str) -> RepositoryResult<Option<Device>> {
        let conn = self.get_conn()?;
        Self::find_device(&conn, id)
    }

    async fn insert_device(&self, draft: &DeviceDraft) -> RepositoryResult<Device> {
        let conn = self.get_conn()?;
        let id = Uuid::new_v4().to_string();
        conn.execute(
            r#"
            INSERT INTO devices (id, asset_tag, serial_no, status, model, brand, department_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                id,
                draft.asset_tag,
                draft.serial_no,
                draft.status.as_str(),
                draft.model,
                draft.brand,
                draft.department_id,
            ],
        )?;

        Self::find_device(&conn, &id)?.ok_or_else(|| {
            RepositoryError::InternalError(format!("新增设备后读取失败: id={}", id))
        })
    }

    async fn update_device(&self, id: &str, draft: &DeviceDraft) -> RepositoryResult<Device> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE devices SET
                asset_tag = ?2,
                serial_no = ?3,
                status = ?4,
                model = ?5,
                brand = ?6,
                department_id = ?7
            WHERE id = ?1
            "#,
            params![
                id,
                draft.asset_tag,
                draft.serial_no,
                draft.status.as_str(),
                draft.model,
                draft.brand,
                draft.department_id,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Device".to_string(),
                id: id.to_string(),
            });
        }

        Self::find_device(&conn, id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Device".to_string(),
            id: id.to_string(),
        })
    }

    async fn upsert_devices(&self, records: &[DeviceRecord]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = Self::upsert_devices_tx(&tx, records)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    async fn soft_delete_devices(&self, ids: &[String]) -> RepositoryResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "UPDATE devices SET deleted_at = ? WHERE id IN ({})",
            placeholders
        );

        let mut args: Vec<Value> = Vec::with_capacity(ids.len() + 1);
        args.push(Value::Text(Utc::now().to_rfc3339()));
        args.extend(ids.iter().map(|id| Value::Text(id.clone())));

        let conn = self.get_conn()?;
        let affected = conn.execute(&sql, params_from_iter(args.iter()))?;
        Ok(affected)
    }
}
