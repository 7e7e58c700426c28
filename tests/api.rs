use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Form, Json, Router,
};
use songbird_desk::api::{ApiClient, ApiError, ContactRequest, Lead, LeadStatus};
use songbird_desk::auth::{self, LoginFailure};
use songbird_desk::leads::{Followup, LeadBoard, LoadOutcome};
use songbird_desk::session::Session;
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

const TOKEN: &str = "tok-123";

#[derive(Default)]
struct FakeApi {
    leads: Vec<Lead>,
    contacts: Vec<ContactRequest>,
    fail_status_updates: bool,
}

type Shared = Arc<Mutex<FakeApi>>;

fn lead(id: i64, name: &str, status: LeadStatus) -> Lead {
    Lead {
        id,
        name: name.into(),
        email: format!("{}@x.com", name.to_lowercase()),
        phone: None,
        content: "hello".into(),
        created_at: "2026-01-02T03:04:05".into(),
        status,
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn detail(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": msg }))).into_response()
}

async fn token(Form(form): Form<HashMap<String, String>>) -> Response {
    let user = form.get("username").map(String::as_str);
    let pass = form.get("password").map(String::as_str);
    if user == Some("admin") && pass == Some("secret") {
        Json(serde_json::json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
    } else {
        detail(StatusCode::BAD_REQUEST, "Incorrect credentials")
    }
}

async fn list(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(state.lock().unwrap().leads.clone()).into_response()
}

async fn update_status(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut state = state.lock().unwrap();
    if state.fail_status_updates {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let status = body
        .get("status")
        .and_then(|s| s.as_str())
        .and_then(LeadStatus::parse);
    let Some(status) = status else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "bad status");
    };
    match state.leads.iter_mut().find(|l| l.id == id) {
        Some(lead) => {
            lead.status = status;
            Json(serde_json::json!({ "status": "updated" })).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn remove(State(state): State<Shared>, Path(id): Path<i64>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let mut state = state.lock().unwrap();
    let before = state.leads.len();
    state.leads.retain(|l| l.id != id);
    if state.leads.len() == before {
        return detail(StatusCode::NOT_FOUND, "Not Found");
    }
    Json(serde_json::json!({ "status": "deleted" })).into_response()
}

async fn contact(State(state): State<Shared>, Json(body): Json<ContactRequest>) -> Response {
    state.lock().unwrap().contacts.push(body);
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

async fn spawn_api(initial: Vec<Lead>) -> (String, Shared) {
    let shared: Shared = Arc::new(Mutex::new(FakeApi {
        leads: initial,
        ..FakeApi::default()
    }));
    let app = Router::new()
        .route("/token", post(token))
        .route("/messages/", get(list))
        .route("/messages/:id/status", patch(update_status))
        .route("/messages/:id", delete(remove))
        .route("/contact/", post(contact))
        .with_state(shared.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), shared)
}

fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn two_leads() -> Vec<Lead> {
    vec![lead(2, "Bo", LeadStatus::Won), lead(1, "Ann", LeadStatus::Pending)]
}

async fn load(api: &ApiClient, session: &Session, board: &mut LeadBoard) -> LoadOutcome {
    board.begin_load();
    let token = session.token().expect("signed in");
    board.absorb(api.leads(&token).await, session)
}

#[tokio::test]
async fn sign_in_stores_token_and_trims_username() {
    let (base, _) = spawn_api(Vec::new()).await;
    let api = ApiClient::new(&base);
    let session = Session::in_memory();

    auth::sign_in(&api, &session, "  admin ", "secret").await.unwrap();
    assert_eq!(session.token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn bad_password_shows_server_detail() {
    let (base, _) = spawn_api(Vec::new()).await;
    let api = ApiClient::new(&base);
    let session = Session::in_memory();

    let err = auth::sign_in(&api, &session, "admin", " secret").await.unwrap_err();
    assert!(matches!(&err, LoginFailure::InvalidCredentials(msg) if msg == "Incorrect credentials"));
    assert!(!session.is_signed_in());
}

#[tokio::test]
async fn unreachable_server_is_reported_as_blocked() {
    let api = ApiClient::new(&dead_address());
    let session = Session::in_memory();

    let err = auth::sign_in(&api, &session, "admin", "secret").await.unwrap_err();
    assert!(matches!(err, LoginFailure::ConnectionBlocked));
    assert!(!session.is_signed_in());
}

#[tokio::test]
async fn board_loads_in_server_order() {
    let (base, _) = spawn_api(two_leads()).await;
    let api = ApiClient::new(&base);
    let session = Session::in_memory();
    auth::sign_in(&api, &session, "admin", "secret").await.unwrap();

    let mut board = LeadBoard::new();
    assert_eq!(load(&api, &session, &mut board).await, LoadOutcome::Ready);
    let ids: Vec<i64> = board.leads().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(board.stats().won, 1);
}

#[tokio::test]
async fn stale_token_signs_out() {
    let (base, _) = spawn_api(two_leads()).await;
    let api = ApiClient::new(&base);
    let session = Session::in_memory();
    session.set_token("expired").unwrap();

    let mut board = LeadBoard::new();
    assert_eq!(load(&api, &session, &mut board).await, LoadOutcome::SignedOut);
    assert!(!session.is_signed_in());

    let err = api.delete_lead("expired", 1).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn failed_status_change_resyncs_from_server() {
    let (base, shared) = spawn_api(two_leads()).await;
    shared.lock().unwrap().fail_status_updates = true;
    let api = ApiClient::new(&base);
    let session = Session::in_memory();
    session.set_token(TOKEN).unwrap();
    let mut board = LeadBoard::new();
    load(&api, &session, &mut board).await;

    let change = board.begin_status_change(1, LeadStatus::Won).unwrap();
    assert_eq!(board.get(1).unwrap().status, LeadStatus::Won);

    let res = api.update_status(TOKEN, change.id, change.status).await;
    assert!(matches!(res, Err(ApiError::Rejected { .. })));
    let followup = board.finish_status_change(change, res, &session);
    assert_eq!(followup, Some(Followup::Resync));

    assert_eq!(load(&api, &session, &mut board).await, LoadOutcome::Ready);
    assert_eq!(board.get(1).unwrap().status, LeadStatus::Pending);
}

#[tokio::test]
async fn accepted_status_change_sticks() {
    let (base, shared) = spawn_api(two_leads()).await;
    let api = ApiClient::new(&base);
    let session = Session::in_memory();
    session.set_token(TOKEN).unwrap();
    let mut board = LeadBoard::new();
    load(&api, &session, &mut board).await;

    let change = board.begin_status_change(1, LeadStatus::Recontact).unwrap();
    let res = api.update_status(TOKEN, change.id, change.status).await;
    assert_eq!(board.finish_status_change(change, res, &session), None);

    load(&api, &session, &mut board).await;
    assert_eq!(board.get(1).unwrap().status, LeadStatus::Recontact);
    let server = shared.lock().unwrap();
    assert_eq!(server.leads.iter().find(|l| l.id == 1).unwrap().status, LeadStatus::Recontact);
}

#[tokio::test]
async fn delete_is_sent_only_after_acceptance() {
    let (base, shared) = spawn_api(two_leads()).await;
    let api = ApiClient::new(&base);
    let session = Session::in_memory();
    session.set_token(TOKEN).unwrap();
    let mut board = LeadBoard::new();
    load(&api, &session, &mut board).await;

    assert_eq!(board.confirm_delete(1, false), None);
    assert_eq!(shared.lock().unwrap().leads.len(), 2);

    let delete = board.confirm_delete(1, true).unwrap();
    let res = api.delete_lead(TOKEN, delete.id()).await;
    assert_eq!(board.finish_delete(delete, res, &session), None);
    assert_eq!(board.leads().iter().map(|l| l.id).collect::<Vec<_>>(), vec![2]);
    assert_eq!(shared.lock().unwrap().leads.len(), 1);
}

#[tokio::test]
async fn failed_delete_resyncs_from_server() {
    let (base, shared) = spawn_api(two_leads()).await;
    let api = ApiClient::new(&base);
    let session = Session::in_memory();
    session.set_token(TOKEN).unwrap();
    let mut board = LeadBoard::new();
    load(&api, &session, &mut board).await;

    // Someone else removed it in the meantime.
    shared.lock().unwrap().leads.retain(|l| l.id != 1);
    let delete = board.confirm_delete(1, true).unwrap();
    let res = api.delete_lead(TOKEN, delete.id()).await;
    assert_eq!(res.as_ref().err().and_then(|e| e.detail()), Some("Not Found"));
    assert_eq!(board.finish_delete(delete, res, &session), Some(Followup::Resync));

    load(&api, &session, &mut board).await;
    assert_eq!(board.leads().iter().map(|l| l.id).collect::<Vec<_>>(), vec![2]);
}

#[tokio::test]
async fn contact_form_posts_without_token() {
    let (base, shared) = spawn_api(Vec::new()).await;
    let api = ApiClient::new(&base);
    let form = ContactRequest {
        name: "Ann".into(),
        email: "a@x.com".into(),
        phone: "555".into(),
        content: "Need a page".into(),
    };

    api.submit_contact(&form).await.unwrap();
    assert_eq!(shared.lock().unwrap().contacts, vec![form]);
}
