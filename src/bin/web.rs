//! Single binary web server: bracket tournament API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT, DEFAULT_BRACKET_SIZE.
//! The caller is identified by the `X-User-Id` header; authentication happens upstream.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use bracket_tournament_web::{
    cast_vote, close_registration, create_team, create_tournament, delete_tournament, match_votes,
    open_registration, register_solo, register_team, resolve_as_organizer, start_if_due,
    tournament_matches, AppConfig, LogNotifier, MatchId, RequestContext, Side, Store, TeamId,
    TournamentError, TournamentId, TournamentSettings, UserId,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// All tournament state. Mutating handlers hold the write guard for the whole operation.
type AppState = Data<RwLock<Store>>;

const USER_HEADER: &str = "X-User-Id";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RegisterSoloBody {
    display_name: String,
}

#[derive(Deserialize)]
struct RegisterTeamBody {
    team_id: TeamId,
}

#[derive(Deserialize)]
struct CreateTeamBody {
    name: String,
    #[serde(default)]
    members: Vec<UserId>,
}

#[derive(Deserialize)]
struct VoteBody {
    voted_for: Side,
}

#[derive(Deserialize)]
struct SetMatchWinnerBody {
    winner_team_id: TeamId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: match id (e.g. /api/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

/// Path segment: team id (e.g. /api/teams/{id})
#[derive(Deserialize)]
struct TeamPath {
    id: TeamId,
}

/// Build the immutable per-request context from the caller header.
fn request_context(req: &HttpRequest) -> RequestContext {
    let user_id = req
        .headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok());
    match user_id {
        Some(id) => RequestContext::for_user(id),
        None => RequestContext::anonymous(),
    }
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::Validation(_) => HttpResponse::BadRequest().json(body),
        TournamentError::Permission(_) => HttpResponse::Forbidden().json(body),
        TournamentError::Conflict(_) => HttpResponse::Conflict().json(body),
        TournamentError::NotFound { .. } => HttpResponse::NotFound().json(body),
    }
}

fn respond<T: Serialize>(result: Result<T, TournamentError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-tournament-web",
    })
}

/// Create a tournament in Draft; the caller becomes its organizer.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    req: HttpRequest,
    body: Json<TournamentSettings>,
) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    respond(create_tournament(&mut store, &ctx, body.into_inner()))
}

/// Get a tournament by id. Starts it first if its start date has passed.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, req: HttpRequest, path: Path<TournamentPath>) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    if let Err(e) = start_if_due(&mut store, &ctx, path.id, &mut rand::thread_rng()) {
        return error_response(&e);
    }
    respond(store.tournament(path.id))
}

/// Tear a tournament down (organizer only).
#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, req: HttpRequest, path: Path<TournamentPath>) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    respond(delete_tournament(&mut store, &ctx, path.id))
}

/// Open registration (Draft -> RegistrationOpen).
#[post("/api/tournaments/{id}/open")]
async fn api_open_registration(state: AppState, req: HttpRequest, path: Path<TournamentPath>) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    respond(open_registration(&mut store, &ctx, path.id))
}

/// Close registration: generate the bracket and start (RegistrationOpen -> InProgress).
#[post("/api/tournaments/{id}/close")]
async fn api_close_registration(state: AppState, req: HttpRequest, path: Path<TournamentPath>) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    respond(close_registration(&mut store, &ctx, path.id, &mut rand::thread_rng()))
}

/// Register the caller as a solo entrant.
#[post("/api/tournaments/{id}/registrations/solo")]
async fn api_register_solo(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
    body: Json<RegisterSoloBody>,
) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    respond(register_solo(&mut store, &ctx, path.id, &body.display_name))
}

/// Register a team (caller must be its captain).
#[post("/api/tournaments/{id}/registrations/team")]
async fn api_register_team(
    state: AppState,
    req: HttpRequest,
    path: Path<TournamentPath>,
    body: Json<RegisterTeamBody>,
) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    respond(register_team(&mut store, &ctx, path.id, body.team_id))
}

/// Bracket: all matches by round, then slot. Clients poll this for results.
#[get("/api/tournaments/{id}/matches")]
async fn api_tournament_matches(state: AppState, req: HttpRequest, path: Path<TournamentPath>) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    if let Err(e) = start_if_due(&mut store, &ctx, path.id, &mut rand::thread_rng()) {
        return error_response(&e);
    }
    respond(tournament_matches(&store, path.id))
}

/// Current votes and tally for a match.
#[get("/api/matches/{id}/votes")]
async fn api_match_votes(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let store = state.read().await;
    respond(match_votes(&store, path.id))
}

/// Cast or change the caller's vote (captains only). Resolves the match when both captains agree.
#[put("/api/matches/{id}/vote")]
async fn api_cast_vote(
    state: AppState,
    notifier: Data<LogNotifier>,
    req: HttpRequest,
    path: Path<MatchPath>,
    body: Json<VoteBody>,
) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    respond(cast_vote(&mut store, &ctx, path.id, body.voted_for, notifier.get_ref()))
}

/// Organizer sets the winner, regardless of votes.
#[put("/api/matches/{id}/winner")]
async fn api_set_match_winner(
    state: AppState,
    notifier: Data<LogNotifier>,
    req: HttpRequest,
    path: Path<MatchPath>,
    body: Json<SetMatchWinnerBody>,
) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    respond(resolve_as_organizer(
        &mut store,
        &ctx,
        path.id,
        body.winner_team_id,
        notifier.get_ref(),
    ))
}

/// Create a team with the caller as captain.
#[post("/api/teams")]
async fn api_create_team(state: AppState, req: HttpRequest, body: Json<CreateTeamBody>) -> HttpResponse {
    let ctx = request_context(&req);
    let mut store = state.write().await;
    respond(create_team(&mut store, &ctx, &body.name, &body.members))
}

#[get("/api/teams/{id}")]
async fn api_get_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    let store = state.read().await;
    respond(store.team(path.id))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(Store::new(config.default_bracket_size)));
    let notifier = Data::new(LogNotifier);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(notifier.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_open_registration)
            .service(api_close_registration)
            .service(api_register_solo)
            .service(api_register_team)
            .service(api_tournament_matches)
            .service(api_match_votes)
            .service(api_cast_vote)
            .service(api_set_match_winner)
            .service(api_create_team)
            .service(api_get_team)
    })
    .bind(bind)?
    .run()
    .await
}
