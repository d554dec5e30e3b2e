use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use gradesheet::{
    StudentRow,
    auth::Token,
    error::SheetsError,
    grade::grade_row,
    sheets::{SheetService, SheetsClient},
};
use serde_json::{Value, json};

/// A write the fake sheet received: spreadsheet, range, query and body.
type RecordedWrite = (String, String, HashMap<String, String>, Value);

#[derive(Clone, Default)]
struct FakeSheet {
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer tok")
}

async fn fetch(
    Path((id, range)): Path<(String, String)>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": { "code": 401 } })));
    }
    match id.as_str() {
        "sheet" => (
            StatusCode::OK,
            Json(json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": [
                    ["10", "80", "90", "70"],
                    ["20", "40", "40", "40", "", ""],
                    [5, 60, 55, 65, "", 72]
                ]
            })),
        ),
        "empty" => (StatusCode::OK, Json(json!({ "range": range, "majorDimension": "ROWS" }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": { "code": 404 } }))),
    }
}

async fn store(
    State(sheet): State<FakeSheet>,
    Path((id, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": { "code": 401 } })));
    }
    let rows = body["values"].as_array().map_or(0, Vec::len);
    sheet.writes.lock().unwrap().push((id, range, query, body));
    (StatusCode::OK, Json(json!({ "updatedRows": rows })))
}

async fn serve(sheet: FakeSheet) -> String {
    let app = Router::new()
        .route("/v4/spreadsheets/{id}/values/{range}", get(fetch).put(store))
        .with_state(sheet);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake sheet");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake sheet");
    });
    format!("http://{addr}")
}

fn token(access: &str) -> Token {
    Token {
        access_token:  access.to_string(),
        refresh_token: None,
        scope:         None,
        token_type:    "Bearer".to_string(),
        expiry_date:   None,
    }
}

fn client(base: &str, id: &str, access: &str) -> SheetsClient {
    SheetsClient::new(reqwest::Client::new(), base, id, token(access))
}

#[tokio::test]
async fn fetch_pads_short_rows_and_reads_numbers_as_text() {
    let base = serve(FakeSheet::default()).await;
    let rows = client(&base, "sheet", "tok")
        .fetch_range("C4:H27")
        .await
        .expect("fetch");

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], StudentRow::new(["10", "80", "90", "70", "", ""]));
    assert_eq!(rows[2].tests(), ["60", "55", "65"]);
    assert_eq!(rows[2].final_score(), "72");
}

#[tokio::test]
async fn fetch_of_empty_range_yields_no_rows() {
    let base = serve(FakeSheet::default()).await;
    let rows = client(&base, "empty", "tok")
        .fetch_range("C4:H27")
        .await
        .expect("fetch");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn fetch_reports_api_errors_with_status() {
    let base = serve(FakeSheet::default()).await;

    let err = client(&base, "missing", "tok")
        .fetch_range("C4:H27")
        .await
        .expect_err("missing sheet");
    assert!(matches!(err, SheetsError::Status { status: 404, .. }), "{err:?}");

    let err = client(&base, "sheet", "stale")
        .fetch_range("C4:H27")
        .await
        .expect_err("bad token");
    assert!(matches!(err, SheetsError::Status { status: 401, .. }), "{err:?}");
}

#[tokio::test]
async fn write_sends_rows_as_user_entered_values() {
    let sheet = FakeSheet::default();
    let base = serve(sheet.clone()).await;
    let rows = vec![
        StudentRow::new(["10", "80", "90", "70", "Approved", "0"]),
        StudentRow::new(["5", "60", "55", "65", "Final Exam", "66"]),
        grade_row(&StudentRow::new(["5", "61", "61", "61", "", "72"])),
    ];

    client(&base, "sheet", "tok")
        .write_range("engenharia_de_software!C4:H27", &rows)
        .await
        .expect("write");

    let writes = sheet.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    let (id, range, query, body) = &writes[0];
    assert_eq!(id, "sheet");
    assert_eq!(range, "engenharia_de_software!C4:H27");
    assert_eq!(query.get("valueInputOption").map(String::as_str), Some("USER_ENTERED"));
    assert_eq!(body["range"], "engenharia_de_software!C4:H27");
    assert_eq!(body["majorDimension"], "ROWS");
    assert_eq!(
        body["values"],
        json!([
            ["10", "80", "90", "70", "Approved", "0"],
            ["5", "60", "55", "65", "Final Exam", "66"],
            ["5", "61", "61", "61", "Final Exam", 66.5]
        ])
    );
    assert!(body["values"][2][5].is_number());
    assert!(body["values"][1][5].is_string());
}

#[tokio::test]
async fn unreachable_api_is_a_transport_error() {
    let err = client("http://127.0.0.1:1", "sheet", "tok")
        .fetch_range("C4:H27")
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, SheetsError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn malformed_api_base_is_rejected() {
    let err = client("not a url", "sheet", "tok")
        .fetch_range("C4:H27")
        .await
        .expect_err("bad base");
    assert!(matches!(err, SheetsError::InvalidUrl(_)), "{err:?}");
}
