use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use gradesheet::{
    Config, RunOutcome, StudentRow,
    error::SheetsError,
    run, run_with_google,
    sheets::SheetService,
};
use serde_json::{Value, json};
use uuid::Uuid;

#[derive(Default)]
struct MemorySheet {
    rows:       Vec<StudentRow>,
    fail_read:  bool,
    fail_write: bool,
    reads:      Mutex<Vec<String>>,
    writes:     Mutex<Vec<(String, Vec<StudentRow>)>>,
}

impl MemorySheet {
    fn with_rows(rows: Vec<StudentRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }
}

impl SheetService for MemorySheet {
    async fn fetch_range(&self, range: &str) -> Result<Vec<StudentRow>, SheetsError> {
        self.reads.lock().unwrap().push(range.to_string());
        if self.fail_read {
            return Err(SheetsError::Status {
                status: 500,
                body:   "backend error".into(),
            });
        }
        Ok(self.rows.clone())
    }

    async fn write_range(&self, range: &str, rows: &[StudentRow]) -> Result<(), SheetsError> {
        if self.fail_write {
            return Err(SheetsError::Status {
                status: 403,
                body:   "read only".into(),
            });
        }
        self.writes
            .lock()
            .unwrap()
            .push((range.to_string(), rows.to_vec()));
        Ok(())
    }
}

fn config() -> Config {
    Config::builder()
        .read_range("C4:H27")
        .write_range("turma!C4:H27")
        .build()
}

fn sample() -> Vec<StudentRow> {
    vec![
        StudentRow::new(["10", "80", "90", "70", "", ""]),
        StudentRow::new(["20", "40", "40", "40", "", ""]),
        StudentRow::new(["5", "60", "55", "65", "", "72"]),
    ]
}

#[tokio::test]
async fn graded_rows_are_written_to_the_write_range() {
    let sheet = MemorySheet::with_rows(sample());
    let outcome = run(&config(), &sheet).await.expect("run");

    assert_eq!(
        outcome,
        RunOutcome::Graded {
            rows:    3,
            written: true,
        }
    );
    assert_eq!(*sheet.reads.lock().unwrap(), ["C4:H27"]);

    let writes = sheet.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, "turma!C4:H27");
    let cells: Vec<Vec<String>> = writes[0].1.iter().map(|row| row.cells().to_vec()).collect();
    assert_eq!(
        cells,
        [
            ["10", "80", "90", "70", "Approved", "0"],
            ["20", "40", "40", "40", "Failed by Absence", "0"],
            ["5", "60", "55", "65", "Final Exam", "66"],
        ]
    );
    assert_eq!(writes[0].1[2].blended_score(), Some(66.0));
}

#[tokio::test]
async fn empty_range_writes_nothing() {
    let sheet = MemorySheet::default();
    let outcome = run(&config(), &sheet).await.expect("run");

    assert_eq!(outcome, RunOutcome::NoData);
    assert!(sheet.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_read_aborts_before_grading() {
    let sheet = MemorySheet {
        rows: sample(),
        fail_read: true,
        ..MemorySheet::default()
    };
    let err = run(&config(), &sheet).await.expect_err("read fails");

    assert!(format!("{err:#}").contains("Could not read range C4:H27"), "{err:#}");
    assert!(sheet.writes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_write_is_reported_not_raised() {
    let sheet = MemorySheet {
        rows: sample(),
        fail_write: true,
        ..MemorySheet::default()
    };
    let outcome = run(&config(), &sheet).await.expect("run");

    assert_eq!(
        outcome,
        RunOutcome::Graded {
            rows:    3,
            written: false,
        }
    );
}

#[tokio::test]
async fn dry_run_skips_the_write() {
    let sheet = MemorySheet::with_rows(sample());
    let mut config = config();
    config.set_dry_run(true);

    let outcome = run(&config, &sheet).await.expect("run");

    assert_eq!(
        outcome,
        RunOutcome::Graded {
            rows:    3,
            written: false,
        }
    );
    assert!(sheet.writes.lock().unwrap().is_empty());
}

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("gradesheet-run-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

type Stored = Arc<Mutex<Option<Value>>>;

async fn fetch(Path((_, range)): Path<(String, String)>) -> Json<Value> {
    Json(json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": [["3", "70", "70", "70"], ["1", "50", "60", "55", "", "80"]]
    }))
}

async fn store(State(stored): State<Stored>, Json(body): Json<Value>) -> Json<Value> {
    *stored.lock().unwrap() = Some(body);
    Json(json!({}))
}

#[tokio::test]
async fn google_run_uses_cached_token_and_configured_endpoint() {
    let stored = Stored::default();
    let app = Router::new()
        .route("/v4/spreadsheets/{id}/values/{range}", get(fetch).put(store))
        .with_state(stored.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake sheet");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake sheet");
    });

    let root = temp_root();
    let credentials = root.join("credentials.json");
    let token = root.join("token.json");
    fs::write(
        &credentials,
        r#"{"installed":{"client_id":"id","client_secret":"s","redirect_uris":["http://localhost"],"token_uri":"http://127.0.0.1:1/token"}}"#,
    )
    .unwrap();
    fs::write(&token, r#"{"access_token":"tok","token_type":"Bearer"}"#).unwrap();

    let config = Config::builder()
        .spreadsheet_id("sheet")
        .credentials_path(credentials)
        .token_path(token)
        .api_base(format!("http://{addr}"))
        .build();

    let outcome = run_with_google(&config).await.expect("run");
    assert_eq!(
        outcome,
        RunOutcome::Graded {
            rows:    2,
            written: true,
        }
    );

    let body = stored.lock().unwrap().clone().expect("write received");
    assert_eq!(body["range"], "engenharia_de_software!C4:H27");
    assert_eq!(
        body["values"],
        json!([["3", "70", "70", "70", "Approved", "0"], ["1", "50", "60", "55", "Final Exam", 67.5]])
    );
    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn google_run_aborts_without_credentials() {
    let root = temp_root();
    let config = Config::builder()
        .credentials_path(root.join("credentials.json"))
        .token_path(root.join("token.json"))
        .build();

    let err = run_with_google(&config).await.expect_err("no credentials");
    assert!(format!("{err:#}").contains("Error loading client secret file"), "{err:#}");
    let _ = fs::remove_dir_all(root);
}
