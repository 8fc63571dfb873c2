// ==========================================
// 设备资产管理 - CSV 解析器
// ==========================================
// 规则: RFC4180 风格引号处理，宽松容错，不抛解析错误
// - 引号切换引用状态；引用内的 "" 视为一个字面引号
// - 引用外的逗号结束字段
// - 引用外的 \n、\r、\r\n 结束一行（\r\n 只算一次）
// - 首行为表头；全空行丢弃
// ==========================================

use crate::importer::device_importer_trait::FileParser;
use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// 解析结果：表头 + 按表头取值的行
///
/// 不变式: 每一行的键集合与 headers 完全一致
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl ParsedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// 将原始文本解析为 ParsedTable
pub fn parse_csv(text: &str) -> ParsedTable {
    let raw_rows = split_records(text);

    let mut iter = raw_rows.into_iter();
    let headers: Vec<String> = match iter.next() {
        Some(first) => first.iter().map(|h| h.trim().to_string()).collect(),
        None => return ParsedTable::default(),
    };

    let rows = iter
        .filter(|fields| fields.iter().any(|cell| !cell.trim().is_empty()))
        .map(|fields| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, header)| {
                    let value = fields.get(idx).map(|v| v.trim()).unwrap_or("");
                    (header.clone(), value.to_string())
                })
                .collect::<HashMap<_, _>>()
        })
        .collect();

    ParsedTable { headers, rows }
}

/// 逐字符切分记录（不做 trim，不丢行）
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => record.push(std::mem::take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    // 无结尾换行时冲刷残留字段
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}

// ==========================================
// CsvParser - 文件入口
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_text(&self, text: &str) -> ParsedTable {
        parse_csv(text)
    }

    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedTable> {
        // 检查文件存在
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        // 检查扩展名
        if let Some(ext) = file_path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        // 非 UTF-8 字节按替换字符处理，去掉 BOM
        let bytes = fs::read(file_path)?;
        let text = String::from_utf8_lossy(&bytes);
        let text = text.strip_prefix('\u{feff}').unwrap_or(&*text);

        Ok(self.parse_text(text))
    }
}
