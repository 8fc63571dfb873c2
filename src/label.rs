// ==========================================
// 设备资产管理 - 二维码标签
// ==========================================
// 职责: 选中设备 → 标签请求（每个 asset_tag 一个编码载荷）
// 说明: 二维码图像经 CodeEncoder 生成，默认实现 QrSvgEncoder
//       输出 SVG data URL；打印页为 A4 网格 HTML
// ==========================================

use crate::config::LabelConfig;
use crate::domain::Device;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use qrcode::render::svg;
use qrcode::QrCode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("标签编码失败 (asset_tag={asset_tag}): {message}")]
    EncodeError { asset_tag: String, message: String },
}

/// 单个标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelItem {
    pub device_id: String,
    pub asset_tag: String,
    /// 编码载荷（即 asset_tag）
    pub payload: String,
}

/// 标签打印请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRequest {
    pub items: Vec<LabelItem>,
    pub code_width_px: u32,
    pub code_margin: u32,
}

/// 外部二维码编码器
pub trait CodeEncoder: Send + Sync {
    /// 载荷 → 图像 data URL
    fn encode_data_url(&self, payload: &str, width_px: u32, margin: u32)
        -> Result<String, String>;
}

/// qrcode 生成 SVG，再以 base64 data URL 输出
///
/// margin 为 0 时不留静区，否则使用标准静区
#[derive(Debug, Clone, Copy, Default)]
pub struct QrSvgEncoder;

impl CodeEncoder for QrSvgEncoder {
    fn encode_data_url(
        &self,
        payload: &str,
        width_px: u32,
        margin: u32,
    ) -> Result<String, String> {
        let code = QrCode::new(payload.as_bytes()).map_err(|e| e.to_string())?;
        let image = code
            .render::<svg::Color<'_>>()
            .min_dimensions(width_px, width_px)
            .quiet_zone(margin > 0)
            .build();
        Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
    }
}

/// 按设备列表顺序挑出选中项；无选中则返回 None
pub fn build_label_request(
    devices: &[Device],
    selected_ids: &[String],
    config: &LabelConfig,
) -> Option<LabelRequest> {
    let selected: HashSet<&str> = selected_ids.iter().map(String::as_str).collect();

    let items: Vec<LabelItem> = devices
        .iter()
        .filter(|d| selected.contains(d.id.as_str()))
        .map(|d| LabelItem {
            device_id: d.id.clone(),
            asset_tag: d.asset_tag.clone(),
            payload: d.asset_tag.clone(),
        })
        .collect();

    if items.is_empty() {
        return None;
    }

    Some(LabelRequest {
        items,
        code_width_px: config.code_width_px,
        code_margin: config.code_margin,
    })
}

/// 生成 A4 打印页（网格，每卡片一个码 + 资产编号）
pub fn render_print_sheet(
    request: &LabelRequest,
    encoder: &dyn CodeEncoder,
    columns: u32,
) -> Result<String, LabelError> {
    let mut cards = String::new();
    for item in &request.items {
        let data_url = encoder
            .encode_data_url(&item.payload, request.code_width_px, request.code_margin)
            .map_err(|message| LabelError::EncodeError {
                asset_tag: item.asset_tag.clone(),
                message,
            })?;
        cards.push_str(&format!(
            r#"<div class="card"><img src="{}" /><small>{}</small></div>"#,
            escape_html(&data_url),
            escape_html(&item.asset_tag)
        ));
    }

    Ok(format!(
        concat!(
            r#"<!doctype html><html><head><meta charset="utf-8" />"#,
            "<style>@page{{size:A4;margin:10mm}}body{{font-family:ui-sans-serif,system-ui}}",
            ".grid{{display:grid;grid-template-columns:repeat({},1fr);gap:12px}}",
            ".card{{border:1px solid #ddd;padding:8px;text-align:center}}",
            "img{{width:100%;height:auto}}small{{display:block;margin-top:6px}}</style></head><body>",
            r#"<div class="grid">{}</div>"#,
            "<script>onload=()=>print()</script></body></html>"
        ),
        columns.max(1),
        cards
    ))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
