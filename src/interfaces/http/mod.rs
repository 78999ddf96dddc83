use crate::application::use_cases::analysis::AnalysisOrchestrator;
use crate::domain::error::{AppError, Result};
use crate::domain::prompt::resolve_prompt;
use crate::infrastructure::storage::StagedUpload;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
    pub uploads_dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub file_name: String,
    pub content_base64: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub result: String,
}

#[post("/analyze")]
async fn analyze(data: web::Data<HttpState>, req: web::Json<AnalyzeRequest>) -> impl Responder {
    let req = req.into_inner();

    let bytes = match decode_upload(&req) {
        Ok(bytes) => bytes,
        Err(e) => {
            add_log(&data.logs, "WARN", "HttpApi", &e.to_string());
            return HttpResponse::BadRequest().body(e.to_string());
        }
    };

    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Analyzing {} ({} bytes)", req.file_name, bytes.len()),
    );

    let upload = match StagedUpload::write(&data.uploads_dir, &req.file_name, &bytes) {
        Ok(upload) => upload,
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Failed to stage upload: {}", e),
            );
            return HttpResponse::InternalServerError().body(e.to_string());
        }
    };

    let prompt = resolve_prompt(req.prompt.as_deref());
    let result = data.orchestrator.analyze(upload.path(), prompt).await;

    let level = if result.starts_with("Error processing file:") {
        "ERROR"
    } else {
        "INFO"
    };
    add_log(
        &data.logs,
        level,
        "HttpApi",
        &format!("Finished {}", req.file_name),
    );

    HttpResponse::Ok().json(AnalyzeResponse { result })
}

/// Checks the request and returns the decoded file bytes
fn decode_upload(req: &AnalyzeRequest) -> Result<Vec<u8>> {
    if req.file_name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "file_name must not be empty".to_string(),
        ));
    }
    let bytes = STANDARD
        .decode(req.content_base64.trim())
        .map_err(|e| AppError::ValidationError(format!("content_base64 is not valid: {}", e)))?;
    if bytes.is_empty() {
        return Err(AppError::ValidationError(
            "content_base64 must not be empty".to_string(),
        ));
    }
    Ok(bytes)
}

#[get("/health")]
async fn health(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "ai_backend": data.orchestrator.has_ai_backend(),
    }))
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = lock_logs(&data.logs);
    HttpResponse::Ok().json(&*logs)
}

fn lock_logs(logs: &Mutex<Vec<LogEntry>>) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
    logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = lock_logs(logs);
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(analyze)
            .service(health)
            .service(get_logs),
    );
}

pub fn start_server(state: HttpState, host: &str, port: u16) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host, port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis_config::AnalysisConfig;
    use actix_web::test as actix_test;

    fn state(uploads_dir: PathBuf) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            orchestrator: Arc::new(AnalysisOrchestrator::new(&AnalysisConfig::default(), None)),
            logs: Arc::new(Mutex::new(Vec::new())),
            uploads_dir,
        })
    }

    #[actix_web::test]
    async fn test_analyze_returns_fallback_summary() {
        let dir = tempfile::tempdir().unwrap();
        let data = state(dir.path().to_path_buf());
        let app = actix_test::init_service(App::new().app_data(data.clone()).configure(configure)).await;

        let body = AnalyzeRequest {
            file_name: "sales.csv".to_string(),
            content_base64: STANDARD.encode("Name,Amount\nAna,10\nBo,250\nCy,500\n"),
            prompt: None,
        };
        let req = actix_test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(&body)
            .to_request();
        let resp: AnalyzeResponse = actix_test::call_and_read_body_json(&app, req).await;

        assert!(resp
            .result
            .starts_with("The dataset contains 3 rows and 2 columns."));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert_eq!(lock_logs(&data.logs).len(), 2);
    }

    #[actix_web::test]
    async fn test_analyze_rejects_empty_upload() {
        let dir = tempfile::tempdir().unwrap();
        let app = actix_test::init_service(
            App::new()
                .app_data(state(dir.path().to_path_buf()))
                .configure(configure),
        )
        .await;

        let body = AnalyzeRequest {
            file_name: "sales.csv".to_string(),
            content_base64: String::new(),
            prompt: None,
        };
        let req = actix_test::TestRequest::post()
            .uri("/api/analyze")
            .set_json(&body)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body = actix_test::read_body(resp).await;
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            "Validation error: content_base64 must not be empty"
        );
    }

    #[test]
    fn test_decode_upload_validation() {
        let request = |file_name: &str, content: &str| AnalyzeRequest {
            file_name: file_name.to_string(),
            content_base64: content.to_string(),
            prompt: None,
        };

        assert!(matches!(
            decode_upload(&request("  ", "YSxiCg==")),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            decode_upload(&request("data.csv", "not base64!")),
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(decode_upload(&request("data.csv", "YSxiCg==")).unwrap(), b"a,b\n");
    }

    #[actix_web::test]
    async fn test_health_reports_backend() {
        let dir = tempfile::tempdir().unwrap();
        let app = actix_test::init_service(
            App::new()
                .app_data(state(dir.path().to_path_buf()))
                .configure(configure),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["ai_backend"], false);
    }

    #[test]
    fn test_log_buffer_is_bounded() {
        let logs = Mutex::new(Vec::new());
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            add_log(&logs, "INFO", "Test", &format!("entry {}", i));
        }
        let logs = lock_logs(&logs);
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 5");
    }
}
