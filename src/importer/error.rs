// ==========================================
// 设备资产管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: CSV 引号不规范不算错误（宽松解析），
//       日期/部门无法识别降级为 NULL，也不算错误
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 写入失败: {0}")]
    CsvWriteError(String),

    // ===== 数据校验错误 =====
    #[error("无有效数据行: 每行必须包含资产编号(asset_tag)与序列号(serial_no)")]
    NoValidRows,

    // ===== 外部存储错误（原样透传）=====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvWriteError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
