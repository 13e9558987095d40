//! Single binary web server: JSON API over the scheduling engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Saved runs are kept in memory for RUN_RETENTION_HOURS (default 12).

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use league_scheduler_web::{
    evaluate_schedule, generate_division_fixtures, generate_round_robin, generate_teams_seeded,
    players_from_csv, run_season, schedule_games, AuthorizationStatus, Authorizer, DivisionConfig,
    EvaluationInput, ManualOverride, Player, RunSnapshot, RunStatus, SeasonRunRequest, Slot,
    SnapshotStore, Team, TeamId,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Stored run + when it was saved (for auto-cleanup).
struct RunEntry {
    snapshot: RunSnapshot,
    saved_at: Instant,
}

/// In-memory run store keyed by run id.
type AppState = Data<RwLock<HashMap<Uuid, RunEntry>>>;

/// Header carrying the caller's league role.
const ROLE_HEADER: &str = "x-league-role";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct GenerateTeamsBody {
    players: Vec<Player>,
    divisions: BTreeMap<String, DivisionConfig>,
    #[serde(default)]
    seed: Option<String>,
}

#[derive(Deserialize)]
struct FixturesBody {
    team_ids: Vec<TeamId>,
}

#[derive(Deserialize)]
struct ScheduleBody {
    teams: Vec<Team>,
    slots: Vec<Slot>,
}

#[derive(Deserialize)]
struct SeasonRunBody {
    players: Vec<Player>,
    divisions: BTreeMap<String, DivisionConfig>,
    #[serde(default)]
    slots: Vec<Slot>,
    #[serde(default)]
    seed: Option<String>,
    #[serde(default)]
    overrides: Vec<ManualOverride>,
}

/// Path segment: season id (e.g. /api/seasons/{season_id}/runs)
#[derive(Deserialize)]
struct SeasonPath {
    season_id: String,
}

/// Path segment: run id (e.g. /api/runs/{run_id})
#[derive(Deserialize)]
struct RunPath {
    run_id: Uuid,
}

/// Role header: "admin" may run the scheduler and any other role is forbidden.
/// A missing header is unauthorized.
struct HeaderAuthorizer {
    role: Option<String>,
}

impl HeaderAuthorizer {
    fn from_request(req: &HttpRequest) -> Self {
        let role = req
            .headers()
            .get(ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty());
        Self { role }
    }
}

impl Authorizer for HeaderAuthorizer {
    fn authorize(&self) -> AuthorizationStatus {
        match self.role.as_deref() {
            None => AuthorizationStatus::Unauthorized,
            Some("admin") => AuthorizationStatus::Authorized,
            Some(_) => AuthorizationStatus::Forbidden,
        }
    }
}

struct MemoryStore<'a> {
    runs: &'a RwLock<HashMap<Uuid, RunEntry>>,
}

impl SnapshotStore for MemoryStore<'_> {
    fn save_snapshot(&self, snapshot: &RunSnapshot) -> Result<(), String> {
        let mut g = self.runs.write().map_err(|_| "lock error".to_string())?;
        g.insert(
            snapshot.run_id,
            RunEntry {
                snapshot: snapshot.clone(),
                saved_at: Instant::now(),
            },
        );
        Ok(())
    }
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "status": "error",
        "error": e.to_string(),
    }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "league-scheduler-web",
    })
}

/// Parse a registration CSV (request body) into validated players.
#[post("/api/players/import")]
async fn api_import_players(body: String) -> HttpResponse {
    match players_from_csv(body.as_bytes()) {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => bad_request(e),
    }
}

/// Generate teams for all divisions (optionally seeded).
#[post("/api/teams/generate")]
async fn api_generate_teams(body: Json<GenerateTeamsBody>) -> HttpResponse {
    match generate_teams_seeded(&body.players, &body.divisions, body.seed.as_deref()) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => bad_request(e),
    }
}

/// Round robin weeks for one list of team ids.
#[post("/api/fixtures")]
async fn api_fixtures(body: Json<FixturesBody>) -> HttpResponse {
    match generate_round_robin(&body.team_ids) {
        Ok(weeks) => HttpResponse::Ok().json(weeks),
        Err(e) => bad_request(e),
    }
}

/// Fixtures + slot allocation + evaluation for already generated teams.
#[post("/api/schedule")]
async fn api_schedule(body: Json<ScheduleBody>) -> HttpResponse {
    let result = generate_division_fixtures(&body.teams)
        .and_then(|fixtures| schedule_games(&body.teams, &body.slots, &fixtures))
        .and_then(|schedule| {
            let evaluation =
                evaluate_schedule(EvaluationInput::from_schedule(&schedule, &body.teams))?;
            Ok((schedule, evaluation))
        });
    match result {
        Ok((schedule, evaluation)) => HttpResponse::Ok().json(serde_json::json!({
            "schedule": schedule,
            "evaluation": evaluation,
        })),
        Err(e) => bad_request(e),
    }
}

/// Full season run: authorize, generate, gate on pending overrides, save.
#[post("/api/seasons/{season_id}/runs")]
async fn api_run_season(
    state: AppState,
    req: HttpRequest,
    path: Path<SeasonPath>,
    body: Json<SeasonRunBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let request = SeasonRunRequest {
        season_id: path.into_inner().season_id,
        players: body.players,
        divisions: body.divisions,
        slots: body.slots,
        seed: body.seed,
    };
    let authorizer = HeaderAuthorizer::from_request(&req);
    let store = MemoryStore { runs: &state };
    let outcome = run_season(&authorizer, &store, &request, &body.overrides);
    let mut response = match outcome.status {
        RunStatus::Success => HttpResponse::Ok(),
        RunStatus::Blocked => HttpResponse::Conflict(),
        RunStatus::Unauthorized => HttpResponse::Unauthorized(),
        RunStatus::Forbidden => HttpResponse::Forbidden(),
        RunStatus::Error => HttpResponse::BadRequest(),
    };
    response.json(outcome)
}

/// Get a saved run by id (404 if not found or expired).
#[get("/api/runs/{run_id}")]
async fn api_get_run(state: AppState, path: Path<RunPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get(&path.run_id) {
        Some(entry) => HttpResponse::Ok().json(&entry.snapshot),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No run" })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_retention_hours() -> u64 {
    12
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let retention_hours: u64 = std::env::var("RUN_RETENTION_HOURS")
        .ok()
        .and_then(|h| h.parse().ok())
        .unwrap_or_else(default_retention_hours);
    let retention = Duration::from_secs(retention_hours * 3600);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<Uuid, RunEntry>::new()));

    // Background task: every 30 minutes, drop runs older than the retention window
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.saved_at.elapsed() < retention);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} expired run(s) (older than {}h)",
                    removed,
                    retention_hours
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_import_players)
            .service(api_generate_teams)
            .service(api_fixtures)
            .service(api_schedule)
            .service(api_run_season)
            .service(api_get_run)
    })
    .bind(bind)?
    .run()
    .await
}
