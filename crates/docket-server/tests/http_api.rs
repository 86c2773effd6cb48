//! Integration tests driving the HTTP boundary end to end.
//!
//! Each test spawns an in-process axum server on 127.0.0.1:0 with in-memory
//! SQLite and a temp-dir file store, then talks to it with a real HTTP client.

use chrono::{Days, Utc};
use reqwest::multipart;
use serde_json::{json, Value};

use docket_server::test_helpers::spawn_test_server;

async fn spawn() -> (reqwest::Client, String) {
    let server = spawn_test_server().await;
    (reqwest::Client::new(), server.base_url)
}

fn incoming_doc(number: &str) -> Value {
    json!({
        "type": "incoming",
        "number": number,
        "date": "2025-07-01",
        "summary": format!("summary for {number}"),
        "document_type": "letter",
        "priority": "high",
        "status": "processing",
        "sender_department": "Department of Planning",
        "main_responsible": "Binh",
        "tags": ["budget", "q3"],
    })
}

async fn create(client: &reqwest::Client, base: &str, body: &Value) {
    let resp = client
        .post(format!("{base}/api/documents"))
        .json(body)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success(), "create failed: {resp:?}");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
}

async fn find_id(client: &reqwest::Client, base: &str, number: &str) -> i64 {
    let all: Vec<Value> = client
        .get(format!("{base}/api/documents"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    all.iter()
        .find(|d| d["number"] == json!(number))
        .and_then(|d| d["id"].as_i64())
        .unwrap_or_else(|| panic!("document {number} not found"))
}

#[tokio::test]
async fn health_check() {
    let (client, base) = spawn().await;
    let body: Value = client
        .get(format!("{base}/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn document_crud_over_http() {
    let (client, base) = spawn().await;

    create(&client, &base, &incoming_doc("CV001")).await;
    let id = find_id(&client, &base, "CV001").await;

    // fetch by id through the resource endpoint
    let doc: Value = client
        .get(format!("{base}/api/documents?id={id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(doc["number"], json!("CV001"));
    assert_eq!(doc["type"], json!("incoming"));
    assert_eq!(doc["priority"], json!("high"));
    assert_eq!(doc["tags"], json!(["budget", "q3"]));
    assert!(doc["created_at"].is_string());

    // full-record update
    let mut updated = incoming_doc("CV001");
    updated["summary"] = json!("amended summary");
    updated["status"] = json!("completed");
    let resp = client
        .put(format!("{base}/api/documents?id={id}"))
        .json(&updated)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let doc: Value = client
        .get(format!("{base}/api/documents?id={id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(doc["summary"], json!("amended summary"));
    assert_eq!(doc["status"], json!("completed"));

    // delete, then the id is gone
    let resp = client
        .delete(format!("{base}/api/documents?id={id}"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let resp = client
        .get(format!("{base}/api/documents?id={id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], json!("not_found"));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn search_over_http() {
    let (client, base) = spawn().await;

    create(&client, &base, &incoming_doc("CV001")).await;
    let mut draft = incoming_doc("CV002");
    draft["status"] = json!("draft");
    create(&client, &base, &draft).await;
    create(
        &client,
        &base,
        &json!({
            "type": "outgoing",
            "number": "CV003",
            "date": "2025-07-10",
            "summary": "reply to the archive",
            "status": "sent",
            "receiver_department": "City Archive",
            "signer": "Director Hoa",
        }),
    )
    .await;

    // keyword over multiple fields, case-insensitive
    let hits: Vec<Value> = client
        .get(format!("{base}/api/documents?search=ARCHIVE"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["number"], json!("CV003"));

    // AND-composition of type and status
    let hits: Vec<Value> = client
        .get(format!("{base}/api/documents?type=incoming&status=draft"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["number"], json!("CV002"));

    // inclusive date range
    let hits: Vec<Value> = client
        .get(format!(
            "{base}/api/documents?date_from=2025-07-10&date_to=2025-07-10"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["number"], json!("CV003"));

    // empty search keys still flip into search mode and match everything
    let hits: Vec<Value> = client
        .get(format!("{base}/api/documents?search=&status="))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 3);

    // organization matches sender or receiver department
    let hits: Vec<Value> = client
        .get(format!("{base}/api/documents?organization=planning"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);

    // an unknown enum value is rejected, not silently ignored
    let resp = client
        .get(format!("{base}/api/documents?type=sideways"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_validation_lists_missing_fields() {
    let (client, base) = spawn().await;

    let resp = client
        .post(format!("{base}/api/documents"))
        .json(&json!({ "notes": "no required fields at all" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], json!("invalid_input"));
    let message = body["message"].as_str().unwrap();
    for field in ["type", "number", "date", "summary"] {
        assert!(message.contains(field), "missing '{field}' in: {message}");
    }
}

#[tokio::test]
async fn update_cannot_change_document_kind() {
    let (client, base) = spawn().await;
    create(&client, &base, &incoming_doc("CV001")).await;
    let id = find_id(&client, &base, "CV001").await;

    let mut flipped = incoming_doc("CV001");
    flipped["type"] = json!("outgoing");
    let resp = client
        .put(format!("{base}/api/documents?id={id}"))
        .json(&flipped)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mutations_of_missing_ids_return_not_found() {
    let (client, base) = spawn().await;

    let resp = client
        .delete(format!("{base}/api/documents?id=999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], json!("not_found"));

    let resp = client
        .put(format!("{base}/api/documents?id=999"))
        .json(&incoming_doc("CV999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}

fn file_form(filename: &str, bytes: Vec<u8>, document_type: &str) -> multipart::Form {
    multipart::Form::new()
        .part(
            "file",
            multipart::Part::bytes(bytes)
                .file_name(filename.to_string())
                .mime_str("application/pdf")
                .unwrap(),
        )
        .text("documentType", document_type.to_string())
}

#[tokio::test]
async fn upload_stores_file_and_serves_it_back() {
    let (client, base) = spawn().await;

    let content = vec![7u8; 1024];
    let resp = client
        .post(format!("{base}/api/upload"))
        .multipart(file_form("budget.pdf", content.clone(), "incoming"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    let path = body["data"]["path"].as_str().unwrap();
    assert!(path.contains("budget.pdf"));
    assert!(path.starts_with("uploads/incoming/"));
    assert_eq!(body["data"]["size"], json!(1024));
    assert_eq!(body["data"]["name"], json!("budget.pdf"));

    // the stored file can be downloaded again
    let resp = client
        .get(format!("{base}/api/files/{path}"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.bytes().await.unwrap().to_vec(), content);
}

#[tokio::test]
async fn upload_rejects_bad_type_and_oversize() {
    let (client, base) = spawn().await;

    // extension not allowed
    let resp = client
        .post(format!("{base}/api/upload"))
        .multipart(file_form("tool.exe", vec![0u8; 1024], "incoming"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("unsupported"));

    // 15 MiB PDF exceeds the 10 MiB limit
    let resp = client
        .post(format!("{base}/api/upload"))
        .multipart(file_form("huge.pdf", vec![0u8; 15 * 1024 * 1024], "incoming"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn upload_without_file_field_fails() {
    let (client, base) = spawn().await;

    let resp = client
        .post(format!("{base}/api/upload"))
        .multipart(multipart::Form::new().text("documentType", "incoming"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn download_of_missing_file_is_not_found() {
    let (client, base) = spawn().await;
    let resp = client
        .get(format!("{base}/api/files/uploads/incoming/none.pdf"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_reflects_deadlines() {
    let (client, base) = spawn().await;
    let today = Utc::now().date_naive();
    let in_two_days = today.checked_add_days(Days::new(2)).unwrap();
    let five_days_ago = today.checked_sub_days(Days::new(5)).unwrap();

    let mut due_soon = incoming_doc("CV001");
    due_soon["processing_deadline"] = json!(in_two_days.to_string());
    create(&client, &base, &due_soon).await;

    let mut late = incoming_doc("CV002");
    late["processing_deadline"] = json!(five_days_ago.to_string());
    create(&client, &base, &late).await;

    // completed documents are exempt from both buckets
    let mut done = incoming_doc("CV003");
    done["processing_deadline"] = json!(five_days_ago.to_string());
    done["status"] = json!("completed");
    create(&client, &base, &done).await;

    let body: Value = client
        .get(format!("{base}/api/dashboard/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["summary"]["incoming"], json!(3));
    assert_eq!(body["summary"]["overdue"], json!(1));
    assert_eq!(body["summary"]["near_deadline"], json!(1));
    assert_eq!(body["notifications"], json!(2));
    assert_eq!(body["recent"].as_array().unwrap().len(), 3);

    let body: Value = client
        .get(format!("{base}/api/dashboard/notifications"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["total"], json!(2));
    assert_eq!(body["overdue"][0]["number"], json!("CV002"));
    assert_eq!(body["near_deadline"][0]["number"], json!("CV001"));
    assert!(body["overdue"][0]["days_until_deadline"].as_i64().unwrap() < 0);

    // most urgent first: the overdue one leads
    let upcoming: Vec<Value> = client
        .get(format!("{base}/api/dashboard/upcoming?limit=10"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(upcoming.len(), 2);
    assert_eq!(upcoming[0]["number"], json!("CV002"));
}

#[tokio::test]
async fn report_buckets_by_type_and_status() {
    let (client, base) = spawn().await;
    create(&client, &base, &incoming_doc("CV001")).await;
    let mut second = incoming_doc("CV002");
    second["document_type"] = json!("decision");
    second["date"] = json!("2025-08-01");
    create(&client, &base, &second).await;

    let report: Value = client
        .get(format!("{base}/api/reports"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["total"], json!(2));
    assert_eq!(report["incoming"], json!(2));
    assert_eq!(report["by_type"]["letter"], json!(1));
    assert_eq!(report["by_type"]["decision"], json!(1));
    assert_eq!(report["by_status"]["processing"], json!(2));

    // the range bounds exclude the August document
    let report: Value = client
        .get(format!(
            "{base}/api/reports?date_from=2025-07-01&date_to=2025-07-31"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(report["total"], json!(1));
}
