use crate::analytics::{summarize, AnalyticsSummary};
use crate::errors::{ApiError, AppError};
use crate::listing::{
    filter_clients, filter_notes, paginate, requested_page, SortDirection, CLIENTS_PER_PAGE,
    NOTES_PER_PAGE,
};
use crate::models::{
    ClientPageQuery, DashboardQuery, LoginCredentials, LoginForm, NewClient, NewNote, NoteForm,
};
use crate::session::{self, Session};
use crate::spelling::{evaluate, GateOutcome};
use crate::state::AppState;
use crate::ui::{
    render_client, render_client_error, render_dashboard, render_login, render_new_client,
    ClientView, DashboardView, NoteDraft, Notice,
};
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Local;
use tracing::{error, info, warn};

pub async fn index(jar: CookieJar) -> Redirect {
    if session::is_authenticated(&jar) {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/auth/login")
    }
}

pub async fn login_page(jar: CookieJar) -> Response {
    if session::is_authenticated(&jar) {
        return Redirect::to("/dashboard").into_response();
    }
    Html(render_login(None, "")).into_response()
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let credentials = LoginCredentials {
        username: form.username.trim().to_string(),
        password: form.password,
    };

    match session::login(&state.backend, jar, &credentials, state.secure_cookies).await {
        Ok((jar, _)) => (jar, Redirect::to("/dashboard")).into_response(),
        Err(ApiError::Auth) => Html(render_login(
            Some("Invalid username or password"),
            &credentials.username,
        ))
        .into_response(),
        Err(_) => Html(render_login(
            Some("Login failed. Please try again."),
            &credentials.username,
        ))
        .into_response(),
    }
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (session::logout(jar), Redirect::to("/auth/login"))
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let Some(session) = Session::from_jar(&jar) else {
        return to_login(jar);
    };

    let search = query.search.unwrap_or_default();
    let status = query.status.unwrap_or_else(|| "all".to_string());

    let clients = match state.backend.list_clients(&session).await {
        Ok(clients) => clients,
        Err(ApiError::Auth) => return to_login(jar),
        Err(err) => {
            error!("failed to fetch clients: {err}");
            let view = DashboardView {
                page: paginate(&[], 1, CLIENTS_PER_PAGE),
                search: &search,
                status: &status,
                total_clients: 0,
                error: Some("Failed to load clients"),
            };
            return Html(render_dashboard(&view)).into_response();
        }
    };

    let matched = filter_clients(&clients, &search, &status);
    let view = DashboardView {
        page: paginate(&matched, requested_page(query.page.as_deref()), CLIENTS_PER_PAGE),
        search: &search,
        status: &status,
        total_clients: clients.len(),
        error: None,
    };
    Html(render_dashboard(&view)).into_response()
}

pub async fn new_client_page(jar: CookieJar) -> Response {
    if !session::is_authenticated(&jar) {
        return to_login(jar);
    }
    Html(render_new_client(&NewClient::default(), None)).into_response()
}

pub async fn create_client(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(mut form): Form<NewClient>,
) -> Response {
    let Some(session) = Session::from_jar(&jar) else {
        return to_login(jar);
    };

    if let Err(message) = form.validate() {
        return Html(render_new_client(&form, Some(&message))).into_response();
    }
    form.assigned_caregiver = session.user_id;

    match state.backend.create_client(&session, &form).await {
        Ok(created) => {
            info!(client_id = created.id, "client created");
            Redirect::to(&format!("/dashboard/client/{}?toast=client-created", created.id))
                .into_response()
        }
        Err(ApiError::Auth) => to_login(jar),
        Err(err) => {
            warn!("failed to create client: {err}");
            Html(render_new_client(&form, Some(&failure_message(&err)))).into_response()
        }
    }
}

pub async fn client_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<u64>,
    Query(query): Query<ClientPageQuery>,
) -> Response {
    let Some(session) = Session::from_jar(&jar) else {
        return to_login(jar);
    };
    let notice = query.toast.as_deref().and_then(Notice::from_toast);
    render_client_page(&state, jar, &session, id, &query, notice, None).await
}

pub async fn add_note(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<u64>,
    Form(form): Form<NoteForm>,
) -> Response {
    let Some(session) = Session::from_jar(&jar) else {
        return to_login(jar);
    };
    let query = ClientPageQuery::default();

    let Some(user_id) = session.user_id else {
        let notice = Notice::Error("Authentication error. Please log in again.".to_string());
        let draft = NoteDraft {
            text: form.note_text,
            issues: Vec::new(),
        };
        return render_client_page(&state, jar, &session, id, &query, Some(notice), Some(draft)).await;
    };

    match evaluate(state.spell_checker.as_ref(), &form.note_text, form.action()) {
        GateOutcome::Submit => {}
        GateOutcome::Hold(issues) => {
            info!(client_id = id, issues = issues.len(), "note held for spelling confirmation");
            let draft = NoteDraft {
                text: form.note_text,
                issues,
            };
            return render_client_page(&state, jar, &session, id, &query, None, Some(draft)).await;
        }
        GateOutcome::Dismissed => {
            info!(client_id = id, "note returned for review");
            let draft = NoteDraft {
                text: form.note_text,
                issues: Vec::new(),
            };
            return render_client_page(&state, jar, &session, id, &query, None, Some(draft)).await;
        }
    }

    let note = NewNote {
        note_text: form.note_text,
        care_client: id,
        created_by: user_id,
    };

    match state.backend.create_note(&session, &note).await {
        Ok(created) => {
            info!(client_id = id, note_id = created.id, "note saved");
            Redirect::to(&format!("/dashboard/client/{id}?toast=note-saved")).into_response()
        }
        Err(ApiError::Auth) => to_login(jar),
        Err(err) => {
            warn!("failed to add note for client {id}: {err}");
            let notice = Notice::Error(failure_message(&err));
            let draft = NoteDraft {
                text: note.note_text,
                issues: Vec::new(),
            };
            render_client_page(&state, jar, &session, id, &query, Some(notice), Some(draft)).await
        }
    }
}

pub async fn get_analytics(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<u64>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let session = Session::from_jar(&jar).ok_or_else(AppError::unauthorized)?;
    let payload = state.backend.note_distribution(&session, id).await?;
    Ok(Json(summarize(&payload)?))
}

async fn render_client_page(
    state: &AppState,
    jar: CookieJar,
    session: &Session,
    id: u64,
    query: &ClientPageQuery,
    notice: Option<Notice>,
    draft: Option<NoteDraft>,
) -> Response {
    let (client, notes, analytics) = tokio::join!(
        state.backend.get_client(session, id),
        state.backend.list_notes(session, id),
        load_analytics(state, session, id),
    );

    let client = match client {
        Ok(client) => client,
        Err(ApiError::Auth) => return to_login(jar),
        Err(err) => {
            error!("failed to fetch client {id}: {err}");
            return Html(render_client_error("Failed to load client details")).into_response();
        }
    };

    let notes = notes.unwrap_or_else(|err| {
        warn!("failed to fetch notes for client {id}: {err}");
        Vec::new()
    });

    let search = query.q.clone().unwrap_or_default();
    let sort = SortDirection::parse(query.sort.as_deref());
    let matched = filter_notes(&notes, &search, sort);

    let view = ClientView {
        client: &client,
        today: Local::now().date_naive(),
        notes: paginate(&matched, requested_page(query.page.as_deref()), NOTES_PER_PAGE),
        total_notes: notes.len(),
        search: &search,
        sort,
        analytics: analytics.as_ref().map_err(|message| message.as_str()),
        notice: notice.as_ref(),
        draft: draft.as_ref(),
    };
    Html(render_client(&view)).into_response()
}

async fn load_analytics(
    state: &AppState,
    session: &Session,
    id: u64,
) -> Result<AnalyticsSummary, String> {
    let summary = match state.backend.note_distribution(session, id).await {
        Ok(payload) => summarize(&payload),
        Err(err) => Err(err),
    };
    summary.map_err(|err| {
        warn!("failed to load analytics for client {id}: {err}");
        "Failed to load analytics data".to_string()
    })
}

fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Network(detail) => detail.clone(),
        _ => "Please try again".to_string(),
    }
}

fn to_login(jar: CookieJar) -> Response {
    (session::logout(jar), Redirect::to("/auth/login")).into_response()
}
