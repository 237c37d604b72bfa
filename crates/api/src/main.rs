mod config;
mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod explain;
    pub mod health;
    pub mod jobs;
    pub mod optimize;
    pub mod validate;
}

use axum::{
    routing::{get, post},
    Router,
};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::optimize::optimize,
            routes::optimize::optimize_week,
            routes::jobs::status,
            routes::jobs::result,
            routes::validate::validate_handler,
            routes::explain::explain,
        ),
        components(schemas(
            types::OptimizationConfig, types::Employee, types::ShiftType, types::GeneratedShift,
            types::Conflict, types::ConflictKind, types::Severity, types::ShiftRef,
            types::OptimizeEnvelope, types::OptimizeParams, types::AnnealingParams,
            types::OptimizationResult, types::Statistics,
            types::EmployeeId, types::ShiftTypeId,
            jobs::JobId, jobs::JobStatus,
            routes::validate::ValidationReport,
            routes::optimize::JobCreated,
            routes::optimize::WeekRequest,
            routes::explain::ExplainIn,
            routes::explain::ExplainOut,
            routes::explain::Weights,
            routes::explain::Counts
        )),
        tags(
            (name = "shiftopt", description = "Shift planning API")
        )
    )]
struct ApiDoc;

fn app(app_state: state::AppState, settings: &config::Settings) -> Router {
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/optimize", post(routes::optimize::optimize))
        .route("/v1/optimize/week", post(routes::optimize::optimize_week))
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/explain", post(routes::explain::explain))
        .route("/v1/jobs/:id", get(routes::jobs::status))
        .route("/v1/jobs/:id/result", get(routes::jobs::result))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack(settings.body_limit))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = config::Settings::from_env()?;
    telemetry::init_tracing(settings.json_logs);

    let app = app(state::AppState::new(&settings), &settings);

    let addr = settings.addr();
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("shutting down"),
                Err(e) => {
                    tracing::error!(?e, "cannot listen for ctrl-c; running until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        let settings = config::Settings::default();
        app(state::AppState::new(&settings), &settings)
    }

    fn config_json() -> Value {
        json!({
            "employees": [
                {"id": "e1", "maxWeeklyHours": 40.0, "minRestHours": 11.0},
                {"id": "e2", "maxWeeklyHours": 40.0, "minRestHours": 11.0}
            ],
            "shiftTypes": [{
                "id": "1", "name": "1", "startTime": "09:00", "endTime": "18:00",
                "durationHours": 9.0
            }],
            "startDate": "2024-01-01",
            "endDate": "2024-01-01"
        })
    }

    async fn call(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let res = router.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_is_ok() {
        let res = router()
            .oneshot(Request::get("/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn validate_reports_problems() {
        let mut cfg = config_json();
        cfg["shiftTypes"] = json!([]);
        let (status, body) = call(router(), "POST", "/v1/validate", Some(cfg)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], false);
        assert_eq!(body["errors"], json!(["shiftTypes is empty"]));
    }

    #[tokio::test]
    async fn explain_flags_double_booking() {
        let shift = json!({
            "employeeId": "e1", "shiftTypeId": "1", "date": "2024-01-01",
            "startTime": "09:00", "endTime": "18:00"
        });
        let input = json!({"config": config_json(), "shifts": [shift.clone(), shift]});
        let (status, body) = call(router(), "POST", "/v1/explain", Some(input)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counts"]["critical"], 2);
        assert_eq!(body["conflicts"][0]["type"], "DOUBLE_BOOKING");
        assert_eq!(body["conflicts"][0]["shift"]["employeeId"], "e1");
    }

    #[tokio::test]
    async fn unknown_job_is_404() {
        let (status, body) = call(router(), "GET", "/v1/jobs/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "job missing not found");
    }

    #[tokio::test]
    async fn optimize_job_runs_to_completion() {
        let router = router();
        let env = json!({"config": config_json(), "params": {"seed": 1}});
        let (status, body) = call(router.clone(), "POST", "/v1/optimize", Some(env)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "queued");
        let id = body["jobId"].as_str().unwrap().to_string();

        let uri = format!("/v1/jobs/{id}/result");
        for _ in 0..200 {
            let (status, body) = call(router.clone(), "GET", &uri, None).await;
            if status == StatusCode::OK {
                assert_eq!(body["success"], true);
                assert_eq!(body["shifts"].as_array().unwrap().len(), 1);
                return;
            }
            assert_eq!(status, StatusCode::CONFLICT);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("job {id} never finished");
    }

    #[tokio::test]
    async fn week_with_empty_roster_is_rejected() {
        let req = json!({
            "weekOf": "2024-01-03",
            "employees": [],
            "shiftTypes": config_json()["shiftTypes"].clone()
        });
        let (status, body) = call(router(), "POST", "/v1/optimize/week", Some(req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "employees is empty");
    }

    #[tokio::test]
    async fn runaway_annealing_params_are_rejected() {
        let env = json!({
            "config": config_json(),
            "params": {"annealing": {"maxIterations": 4294967295u64, "coolingRate": 5.0}}
        });
        let (status, body) = call(router(), "POST", "/v1/optimize", Some(env)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let msg = body["error"].as_str().unwrap();
        assert!(msg.contains("maxIterations 4294967295"), "{msg}");
        assert!(msg.contains("coolingRate 5"), "{msg}");
    }

    #[tokio::test]
    async fn week_rejects_bad_params_too() {
        let req = json!({
            "weekOf": "2024-01-03",
            "employees": config_json()["employees"].clone(),
            "shiftTypes": config_json()["shiftTypes"].clone(),
            "params": {"annealing": {"initialTemperature": 0.0}}
        });
        let (status, body) = call(router(), "POST", "/v1/optimize/week", Some(req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "initialTemperature 0 must be positive");
    }

    #[tokio::test]
    async fn validate_keeps_semicolons_in_messages() {
        let mut cfg = config_json();
        cfg["shiftTypes"][0]["startTime"] = json!("9;am");
        let (status, body) = call(router(), "POST", "/v1/validate", Some(cfg)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["errors"],
            json!(["shift type 1 has invalid startTime \"9;am\""])
        );
    }
}
