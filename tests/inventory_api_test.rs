// ==========================================
// InventoryApi 集成测试
// ==========================================
// 测试目标: 台账维护、筛选、导入预览/提交、导出、标签
// ==========================================


use device_inventory::importer::parse_csv;
use device_inventory::logging;
use device_inventory::{ApiError, DeviceDraft, DeviceFilter, DeviceStatus};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use test_helpers::{count_device_rows, create_test_api, create_test_db, seed_departments, FIXTURE_CSV};

fn draft(asset_tag: &str, serial_no: &str) -> DeviceDraft {
    DeviceDraft {
        asset_tag: asset_tag.to_string(),
        serial_no: serial_no.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_list_filters() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    seed_departments(&db_path).unwrap();
    let api = create_test_api(&db_path).unwrap();

    api.create_device(DeviceDraft {
        model: Some("ThinkPad".to_string()),
        department_id: Some(1),
        ..draft("LT-2", "SN-B")
    })
    .await
    .unwrap();
    api.create_device(DeviceDraft {
        status: DeviceStatus::InRepair,
        department_id: Some(2),
        ..draft("LT-1", "SN-A")
    })
    .await
    .unwrap();
    api.create_device(DeviceDraft {
        model: Some("Dock".to_string()),
        ..draft("DK-9", "SN-C")
    })
    .await
    .unwrap();

    let all = api.list_devices(&DeviceFilter::default()).await.unwrap();
    let tags: Vec<&str> = all.iter().map(|d| d.asset_tag.as_str()).collect();
    assert_eq!(tags, vec!["DK-9", "LT-1", "LT-2"]);

    let by_search = api
        .list_devices(&DeviceFilter {
            search: " thinkPAD ".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_search.len(), 1);
    assert_eq!(by_search[0].asset_tag, "LT-2");

    let by_serial = api
        .list_devices(&DeviceFilter {
            search: "sn-c".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_serial[0].asset_tag, "DK-9");

    let by_status = api
        .list_devices(&DeviceFilter {
            status: Some(DeviceStatus::InRepair),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0].asset_tag, "LT-1");

    let by_department = api
        .list_devices(&DeviceFilter {
            department_id: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_department.len(), 1);
    assert_eq!(by_department[0].asset_tag, "LT-2");
}

#[tokio::test]
async fn test_duplicate_asset_tag_rejected_on_create() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = create_test_api(&db_path).unwrap();

    api.create_device(draft("A1", "S1")).await.unwrap();
    let result = api.create_device(draft("A1", "S2")).await;
    assert!(result.is_err(), "asset_tag 唯一");
    assert_eq!(count_device_rows(&db_path).unwrap(), 1);
}

#[tokio::test]
async fn test_update_missing_device_is_not_found() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = create_test_api(&db_path).unwrap();

    let result = api.update_device("no-such-id", draft("A1", "S1")).await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_soft_deleted_devices_hidden_but_kept() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = create_test_api(&db_path).unwrap();

    let a = api.create_device(draft("A1", "S1")).await.unwrap();
    api.create_device(draft("A2", "S2")).await.unwrap();

    let affected = api.soft_delete_devices(&[a.id.clone()]).await.unwrap();
    assert_eq!(affected, 1);

    let remaining = api.list_devices(&DeviceFilter::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].asset_tag, "A2");
    assert_eq!(count_device_rows(&db_path).unwrap(), 2);
}

#[tokio::test]
async fn test_preview_then_commit_fixture() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_departments(&db_path).unwrap();
    let api = create_test_api(&db_path).unwrap();

    let (table, preview) = api.preview_import_file(Path::new(FIXTURE_CSV)).unwrap();
    assert_eq!(preview.total_rows, 6);
    assert_eq!(preview.rows.len(), 6);
    assert_eq!(preview.headers[0], "asset_tag");

    let summary = api.commit_import(&table).await.unwrap();
    assert_eq!(summary.imported, 4);
    assert_eq!(summary.skipped, 2);
}

#[tokio::test]
async fn test_export_reimport_is_stable() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().unwrap();
    seed_departments(&db_path).unwrap();
    let api = create_test_api(&db_path).unwrap();
    api.import_file(Path::new(FIXTURE_CSV)).await.unwrap();

    let dir = TempDir::new().unwrap();
    let path = api
        .export_to_file(&DeviceFilter::default(), dir.path())
        .await
        .unwrap();
    let exported = fs::read_to_string(&path).unwrap();

    let table = parse_csv(&exported);
    assert_eq!(table.len(), 4);
    assert_eq!(table.rows[0]["department"], "IT");
    assert_eq!(table.rows[0]["model"], "ThinkPad X1, Gen 11");
    assert_eq!(table.rows[3]["model"], "Monitor \"27in\"");
    assert_eq!(table.rows[3]["department"], "");

    // 导出文件重新导入：按 asset_tag 更新，不新增行
    let before = api.list_devices(&DeviceFilter::default()).await.unwrap();
    let summary = api.commit_import(&table).await.unwrap();
    assert_eq!(summary.imported, 4);
    assert_eq!(count_device_rows(&db_path).unwrap(), 4);

    let after = api.list_devices(&DeviceFilter::default()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_labels_for_filtered_selection() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = create_test_api(&db_path).unwrap();

    let a = api.create_device(draft("A1", "S1")).await.unwrap();
    let b = api
        .create_device(DeviceDraft {
            status: DeviceStatus::Lost,
            ..draft("B1", "S2")
        })
        .await
        .unwrap();

    // 只对当前列表中可见的设备生成标签
    let filter = DeviceFilter {
        status: Some(DeviceStatus::Active),
        ..Default::default()
    };
    let request = api
        .label_request(&filter, &[a.id.clone(), b.id.clone()])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(request.items.len(), 1);
    assert_eq!(request.items[0].payload, "A1");

    let none = api.label_request(&filter, &[b.id.clone()]).await.unwrap();
    assert!(none.is_none());
}
