use std::path::Path;

use crmdesk_application::{EntityLayout, LayoutKind, MetadataSource, SessionSource};
use crmdesk_core::{AppError, UserType};
use crmdesk_domain::FieldType;
use serde_json::{Value, json};
use tempfile::TempDir;

use super::JsonDirectorySource;

fn write_json(root: &Path, relative: &str, value: &Value) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap_or_else(|_| unreachable!());
    }
    std::fs::write(path, value.to_string()).unwrap_or_else(|_| unreachable!());
}

fn snapshot_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
    write_json(
        dir.path(),
        "metadata.json",
        &json!({
            "entityDefs": {
                "Account": {
                    "fields": {
                        "name": {"type": "varchar", "required": true},
                        "type": {"type": "enum", "options": ["Customer", "Partner"]}
                    }
                }
            },
            "clientDefs": {
                "Account": {
                    "dynamicLogic": {
                        "fields": {
                            "type": {"visible": {"conditionGroup": [
                                {"type": "isNotEmpty", "attribute": "name"}
                            ]}}
                        }
                    }
                }
            }
        }),
    );
    write_json(
        dir.path(),
        "session.json",
        &json!({
            "user": {"id": "u1", "userName": "alice", "type": "regular", "teamsIds": ["t1"]},
            "acl": {"table": {"Account": {"read": "team", "edit": "own"}}}
        }),
    );
    dir
}

#[tokio::test]
async fn reads_metadata_and_session_payloads() {
    let dir = snapshot_dir();
    let source = JsonDirectorySource::new(dir.path());

    let metadata = source
        .fetch_metadata()
        .await
        .unwrap_or_else(|_| unreachable!());
    let fields = metadata
        .fields("Account")
        .unwrap_or_else(|| unreachable!());
    assert_eq!(
        fields.get("type").map(|field| field.field_type().clone()),
        Some(FieldType::SingleChoice)
    );
    assert!(metadata.dynamic_logic("Account").is_some());

    let session = source
        .fetch_session()
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(session.user.user_name(), "alice");
    assert_eq!(session.user.user_type(), UserType::Regular);
    assert!(session.acl.scope("Account").is_some());
}

#[tokio::test]
async fn missing_layout_files_mean_no_declared_layout() {
    let dir = snapshot_dir();
    write_json(
        dir.path(),
        "layouts/Account/list.json",
        &json!([{"name": "name", "link": true}, {"name": "type", "width": 20}]),
    );
    let source = JsonDirectorySource::new(dir.path());

    let list = source.fetch_layout("Account", LayoutKind::List).await;
    let Ok(Some(EntityLayout::List(list))) = list else {
        unreachable!()
    };
    assert_eq!(list.columns().len(), 2);
    assert!(list.columns()[0].is_link());

    let detail = source.fetch_layout("Account", LayoutKind::Detail).await;
    assert!(matches!(detail, Ok(None)));
}

#[tokio::test]
async fn detail_layouts_keep_placeholders() {
    let dir = snapshot_dir();
    write_json(
        dir.path(),
        "layouts/Account/detail.json",
        &json!([{"label": "Overview", "rows": [[{"name": "name"}, false]]}]),
    );
    let source = JsonDirectorySource::new(dir.path());

    let detail = source.fetch_layout("Account", LayoutKind::Detail).await;
    let Ok(Some(EntityLayout::Detail(detail))) = detail else {
        unreachable!()
    };
    let row = &detail.panels()[0].rows()[0];
    assert_eq!(row.len(), 2);
    assert_eq!(row[0].cell().map(|cell| cell.name()), Some("name"));
    assert!(row[1].cell().is_none());
}

#[tokio::test]
async fn reports_missing_and_malformed_files() {
    let empty = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
    let source = JsonDirectorySource::new(empty.path());
    assert!(matches!(
        source.fetch_session().await,
        Err(AppError::NotFound(_))
    ));

    std::fs::write(empty.path().join("metadata.json"), "{not json")
        .unwrap_or_else(|_| unreachable!());
    assert!(matches!(
        source.fetch_metadata().await,
        Err(AppError::Internal(_))
    ));
}

#[tokio::test]
async fn rejects_entity_types_that_escape_the_directory() {
    let dir = snapshot_dir();
    let source = JsonDirectorySource::new(dir.path());

    let result = source.fetch_layout("../secrets", LayoutKind::Detail).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}
