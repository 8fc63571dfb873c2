// ==========================================
// 设备资产管理 - 命令行入口
// ==========================================
// 用法:
//   device-inventory departments
//   device-inventory add-department <name> [code]
//   device-inventory list [search] [status] [department_id]
//   device-inventory preview <csv>
//   device-inventory import <csv>
//   device-inventory export [dir]
//   device-inventory delete <id>...
//   device-inventory labels [--html <out.html>] <id>...
// 环境变量: DEVICE_INVENTORY_CONFIG / DEVICE_INVENTORY_DB_PATH / RUST_LOG
// ==========================================

use anyhow::{bail, Context};
use device_inventory::config::InventoryConfig;
use device_inventory::domain::{DeviceFilter, DeviceStatus};
use device_inventory::label::QrSvgEncoder;
use device_inventory::repository::DeviceRepositoryImpl;
use device_inventory::{logging, InventoryApi};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str = "用法: device-inventory <departments|add-department|list|preview|import|export|delete|labels> [参数...]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let Some(command) = args.next() else {
        eprintln!("{}", USAGE);
        return Ok(());
    };
    let rest: Vec<String> = args.collect();

    let config = InventoryConfig::load().context("加载配置失败")?;
    tracing::info!(
        version = device_inventory::VERSION,
        db_path = %config.db_path,
        "{} 启动",
        device_inventory::APP_NAME
    );

    let repo = DeviceRepositoryImpl::new(&config.db_path)
        .with_context(|| format!("无法打开数据库: {}", config.db_path))?;
    let api = InventoryApi::new(Arc::new(repo), config);

    match command.as_str() {
        "departments" => {
            for dept in api.list_departments().await? {
                println!(
                    "{}\t{}\t{}",
                    dept.id,
                    dept.name,
                    dept.code.as_deref().unwrap_or("")
                );
            }
        }
        "add-department" => {
            let Some(name) = rest.first() else {
                bail!("add-department 需要部门名称");
            };
            let dept = api
                .add_department(name, rest.get(1).map(String::as_str))
                .await?;
            println!("{}", dept.id);
        }
        "list" => {
            let filter = parse_filter(&rest)?;
            for device in api.list_devices(&filter).await? {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    device.id,
                    device.asset_tag,
                    device.serial_no,
                    device.status,
                    device.model.as_deref().unwrap_or("")
                );
            }
        }
        "preview" => {
            let path = required_path(&rest, "preview")?;
            let (_, preview) = api.preview_import_file(&path)?;
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        "import" => {
            let path = required_path(&rest, "import")?;
            let summary = api.import_file(&path).await?;
            println!(
                "导入完成: 共 {} 行, 写入 {} 行, 跳过 {} 行",
                summary.total_rows, summary.imported, summary.skipped
            );
        }
        "export" => {
            let dir = rest
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            let path = api
                .export_to_file(&DeviceFilter::default(), &dir)
                .await?;
            println!("{}", path.display());
        }
        "delete" => {
            let affected = api.soft_delete_devices(&rest).await?;
            println!("已删除 {} 台设备", affected);
        }
        "labels" => {
            let (html_out, ids) = split_html_flag(&rest)?;
            match html_out {
                Some(out) => {
                    match api
                        .label_sheet(&DeviceFilter::default(), &ids, &QrSvgEncoder)
                        .await?
                    {
                        Some(html) => {
                            fs::write(&out, html)
                                .with_context(|| format!("写入 {} 失败", out.display()))?;
                            println!("{}", out.display());
                        }
                        None => eprintln!("未选中任何设备"),
                    }
                }
                None => match api.label_request(&DeviceFilter::default(), &ids).await? {
                    Some(request) => println!("{}", serde_json::to_string_pretty(&request)?),
                    None => eprintln!("未选中任何设备"),
                },
            }
        }
        other => bail!("未知命令: {}\n{}", other, USAGE),
    }

    Ok(())
}

/// labels 参数：可选 `--html <out>`，其余为设备 id
fn split_html_flag(rest: &[String]) -> anyhow::Result<(Option<PathBuf>, Vec<String>)> {
    let mut html_out = None;
    let mut ids = Vec::new();
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        if arg == "--html" {
            let Some(out) = iter.next() else {
                bail!("--html 需要输出文件路径");
            };
            html_out = Some(PathBuf::from(out));
        } else {
            ids.push(arg.clone());
        }
    }
    Ok((html_out, ids))
}

fn required_path(rest: &[String], command: &str) -> anyhow::Result<PathBuf> {
    match rest.first() {
        Some(p) => Ok(PathBuf::from(p)),
        None => bail!("{} 需要 CSV 文件路径", command),
    }
}

/// list [search] [status] [department_id]；空串或 "-" 表示不筛选
fn parse_filter(rest: &[String]) -> anyhow::Result<DeviceFilter> {
    let arg = |i: usize| {
        rest.get(i)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty() && *s != "-")
    };

    let department_id = match arg(2) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .with_context(|| format!("无效的部门 id: {}", raw))?,
        ),
        None => None,
    };

    Ok(DeviceFilter {
        search: arg(0).unwrap_or_default().to_string(),
        status: arg(1).map(DeviceStatus::from_raw),
        department_id,
    })
}
