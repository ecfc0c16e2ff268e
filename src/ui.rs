use crate::analytics::AnalyticsSummary;
use crate::listing::{Page, SortDirection};
use crate::models::{CareClient, ClientNote, NewClient, CARE_STATUS_CHOICES, GENDER_CHOICES};
use crate::spelling::SpellingIssue;
use chrono::{DateTime, NaiveDate};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn from_toast(key: &str) -> Option<Self> {
        match key {
            "note-saved" => Some(Notice::Success("Note saved successfully!".to_string())),
            "client-created" => Some(Notice::Success("Client Created Successfully!".to_string())),
            _ => None,
        }
    }
}

/// A note that has not been submitted yet, echoed back into the form.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub text: String,
    pub issues: Vec<SpellingIssue>,
}

pub struct DashboardView<'a> {
    pub page: Page<&'a CareClient>,
    pub search: &'a str,
    pub status: &'a str,
    pub total_clients: usize,
    pub error: Option<&'a str>,
}

pub struct ClientView<'a> {
    pub client: &'a CareClient,
    pub today: NaiveDate,
    pub notes: Page<&'a ClientNote>,
    pub total_notes: usize,
    pub search: &'a str,
    pub sort: SortDirection,
    pub analytics: Result<&'a AnalyticsSummary, &'a str>,
    pub notice: Option<&'a Notice>,
    pub draft: Option<&'a NoteDraft>,
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn query_escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(byte as char),
            b' ' => out.push('+'),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    LAYOUT_HTML
        .replace("{{TITLE}}", &escape(title))
        .replace("{{BODY}}", body)
}

fn notice_html(notice: Option<&Notice>) -> String {
    match notice {
        Some(Notice::Success(message)) => format!(
            r#"<div class="toast ok" role="status">{}<button type="button" class="dismiss" aria-label="Close">&times;</button></div>"#,
            escape(message)
        ),
        Some(Notice::Error(message)) => format!(
            r#"<div class="toast error" role="alert">{}<button type="button" class="dismiss" aria-label="Close">&times;</button></div>"#,
            escape(message)
        ),
        None => String::new(),
    }
}

pub fn render_login(error: Option<&str>, username: &str) -> String {
    let banner = error
        .map(|message| format!(r#"<div class="banner error">{}</div>"#, escape(message)))
        .unwrap_or_default();
    let body = format!(
        r#"<main class="card narrow">
  <header>
    <h1>Remote Care</h1>
    <p class="subtitle">Sign in to your account</p>
  </header>
  {banner}
  <form method="post" action="/auth/login" class="stack">
    <label>Username <input name="username" value="{username}" required autofocus /></label>
    <label>Password <input name="password" type="password" required /></label>
    <button type="submit" class="primary">Sign in</button>
  </form>
</main>"#,
        username = escape(username),
    );
    layout("Sign in", &body)
}

pub fn render_dashboard(view: &DashboardView) -> String {
    let mut body = String::new();
    body.push_str(&nav_html());
    body.push_str(r#"<main class="card wide">"#);
    let _ = write!(
        body,
        r#"<header class="row">
  <div>
    <h1>Clients</h1>
    <p class="subtitle">{} of {} clients</p>
  </div>
  <a class="button primary" href="/dashboard/client/new">New client</a>
</header>"#,
        view.page.total_items, view.total_clients
    );

    let _ = write!(
        body,
        r#"<form method="get" action="/dashboard" class="filters">
  <input type="search" name="search" placeholder="Search by name or address" value="{}" />
  <select name="status">{}</select>
  <button type="submit">Filter</button>
</form>"#,
        escape(view.search),
        status_options(view.status)
    );

    if let Some(error) = view.error {
        let _ = write!(body, r#"<div class="banner error">{}</div>"#, escape(error));
    } else if view.page.items.is_empty() {
        body.push_str(r#"<p class="empty">No clients match the current filters.</p>"#);
    } else {
        body.push_str(r#"<section class="grid">"#);
        for client in &view.page.items {
            body.push_str(&client_card(client));
        }
        body.push_str("</section>");
        body.push_str(&pagination_html(&view.page, |page| {
            format!(
                "/dashboard?search={}&status={}&page={page}",
                query_escape(view.search),
                query_escape(view.status)
            )
        }));
    }

    body.push_str("</main>");
    layout("Clients", &body)
}

fn nav_html() -> String {
    r#"<nav class="topbar">
  <a class="brand" href="/dashboard">Remote Care</a>
  <form method="post" action="/auth/logout"><button type="submit" class="link">Log out</button></form>
</nav>"#
        .to_string()
}

fn status_options(selected: &str) -> String {
    let mut options = String::new();
    let all_selected = if selected.is_empty() || selected == "all" { " selected" } else { "" };
    let _ = write!(options, r#"<option value="all"{all_selected}>All statuses</option>"#);
    for status in CARE_STATUS_CHOICES {
        let flag = if status == selected { " selected" } else { "" };
        let _ = write!(options, r#"<option value="{status}"{flag}>{status}</option>"#);
    }
    options
}

fn status_class(status: &str) -> &'static str {
    match status.to_lowercase().as_str() {
        "active" => "status active",
        "inactive" => "status inactive",
        "under review" | "pending" => "status review",
        _ => "status",
    }
}

fn client_card(client: &CareClient) -> String {
    format!(
        r#"<a class="client-card" href="/dashboard/client/{id}">
  <span class="name">{name}</span>
  <span class="{class}">{status}</span>
  <span class="meta">{gender}</span>
  <span class="meta">{address}</span>
</a>"#,
        id = client.id,
        name = escape(&client.full_name()),
        class = status_class(&client.care_status),
        status = escape(&client.care_status),
        gender = escape(&client.gender),
        address = escape(client.address.as_deref().unwrap_or("No address on file")),
    )
}

fn pagination_html<T>(page: &Page<T>, link: impl Fn(usize) -> String) -> String {
    if page.total_pages <= 1 {
        return String::new();
    }
    let mut html = String::from(r#"<nav class="pagination">"#);
    if page.has_previous() {
        let _ = write!(html, r#"<a href="{}">Previous</a>"#, escape(&link(page.current - 1)));
    }
    for number in page.numbers() {
        if number == page.current {
            let _ = write!(html, r#"<span class="current">{number}</span>"#);
        } else {
            let _ = write!(html, r#"<a href="{}">{number}</a>"#, escape(&link(number)));
        }
    }
    if page.has_next() {
        let _ = write!(html, r#"<a href="{}">Next</a>"#, escape(&link(page.current + 1)));
    }
    html.push_str("</nav>");
    html
}

pub fn render_client_error(message: &str) -> String {
    let body = format!(
        r#"{}<main class="card"><div class="banner error">{}</div><a href="/dashboard">Back to dashboard</a></main>"#,
        nav_html(),
        escape(message)
    );
    layout("Client", &body)
}

pub fn render_client(view: &ClientView) -> String {
    let client = view.client;
    let mut body = nav_html();
    body.push_str(&notice_html(view.notice));
    body.push_str(r#"<main class="card wide">"#);

    let age = client
        .age_on(view.today)
        .map(|age| age.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let _ = write!(
        body,
        r#"<header class="row">
  <div>
    <h1>{name}</h1>
    <p class="subtitle"><span class="{class}">{status}</span></p>
  </div>
  <a class="button" href="/dashboard">Back to dashboard</a>
</header>
<section class="details">
  {dob}{age}{gender}{address}{contact}{emergency}{emergency_number}{care_notes}
</section>"#,
        name = escape(&client.full_name()),
        class = status_class(&client.care_status),
        status = escape(&client.care_status),
        dob = detail("Date of birth", client.date_of_birth.as_deref()),
        age = detail("Age", Some(age.as_str())),
        gender = detail("Gender", Some(client.gender.as_str())),
        address = detail("Address", client.address.as_deref()),
        contact = detail("Contact number", client.contact_number.as_deref()),
        emergency = detail("Emergency contact", client.emergency_contact_name.as_deref()),
        emergency_number = detail("Emergency number", client.emergency_contact_number.as_deref()),
        care_notes = detail("Care notes", client.care_notes.as_deref()),
    );

    body.push_str(&analytics_html(view.analytics));
    body.push_str(&note_form_html(client.id, view.draft));
    body.push_str(&notes_table_html(view));
    body.push_str("</main>");
    layout(&client.full_name(), &body)
}

fn detail(label: &str, value: Option<&str>) -> String {
    let value = value.filter(|v| !v.is_empty()).unwrap_or("Not provided");
    format!(
        r#"<div class="detail"><span class="label">{}</span><span class="value">{}</span></div>"#,
        escape(label),
        escape(value)
    )
}

/// Chart datasets embedded in the page so the browser draws the same
/// summary the server rendered. `<` is escaped to keep the script element closed.
fn chart_data_json(summary: &AnalyticsSummary) -> String {
    let data = serde_json::json!({
        "sentiment_chart": summary.sentiment_chart,
        "emotion_chart": summary.emotion_chart,
    });
    data.to_string().replace('<', "\\u003c")
}

fn analytics_html(analytics: Result<&AnalyticsSummary, &str>) -> String {
    let summary = match analytics {
        Ok(summary) => summary,
        Err(message) => {
            return format!(
                r#"<section class="analytics"><h2>Sentiment &amp; Emotion Analysis</h2><div class="banner error">{}</div></section>"#,
                escape(message)
            );
        }
    };

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<section class="analytics" id="analytics">
  <h2>Sentiment &amp; Emotion Analysis</h2>
  <script type="application/json" id="analytics-data">{}</script>
  <div class="charts">
    <figure><svg id="sentiment-chart" viewBox="0 0 300 220" role="img" aria-label="Sentiment distribution"></svg><figcaption>Sentiment Distribution</figcaption></figure>
    <figure><svg id="emotion-chart" viewBox="0 0 600 260" role="img" aria-label="Emotion distribution"></svg><figcaption>Emotion Distribution</figcaption></figure>
  </div>
  <div class="panel">"#,
        chart_data_json(summary)
    );

    for share in summary.present_buckets() {
        let _ = write!(
            html,
            r#"<div class="stat"><span class="label">{}</span><span class="value sentiment-{}">{:.1}%</span></div>"#,
            share.bucket.key(),
            share.bucket.key(),
            share.percentage
        );
    }
    html.push_str("</div>");

    if let Some(dominant) = summary.dominant_emotion() {
        let _ = write!(
            html,
            r#"<p class="hint">Most common emotion: <strong>{} ({:.1}%)</strong></p>"#,
            escape(&dominant.name),
            dominant.percentage
        );
    }

    let _ = write!(
        html,
        r#"<div class="summary"><h3>Analysis Summary</h3><p id="narrative">{}</p>"#,
        escape(&summary.narrative_summary)
    );

    html.push_str(r#"<div class="insights"><div><h4>Primary Emotions</h4><ul>"#);
    for emotion in summary.primary_emotions() {
        let _ = write!(
            html,
            "<li><span>{}</span><span>{:.1}%</span></li>",
            escape(&emotion.name),
            emotion.percentage
        );
    }
    html.push_str(r#"</ul></div><div><h4>Sentiment Overview</h4><ul>"#);
    for share in summary.sentiment_overview() {
        let _ = write!(
            html,
            "<li><span>{}</span><span>{:.1}%</span></li>",
            share.bucket.key(),
            share.percentage
        );
    }
    html.push_str("</ul></div></div></div></section>");
    html
}

fn note_form_html(client_id: u64, draft: Option<&NoteDraft>) -> String {
    let text = draft.map(|d| d.text.as_str()).unwrap_or_default();
    let prompt = match draft {
        Some(draft) if !draft.issues.is_empty() => {
            let words: Vec<String> = draft.issues.iter().map(|i| escape(&i.word)).collect();
            format!(
                r#"<div class="toast warn" id="spelling-prompt" role="alertdialog">
  <p><strong>Spelling Errors Detected</strong></p>
  <p>Would you like to continue anyway? ({words})</p>
  <div class="row">
    <button type="submit" name="confirmed" value="true" class="warn">Continue</button>
    <button type="submit" name="confirmed" value="review">Review Changes</button>
  </div>
</div>"#,
                words = words.join(", ")
            )
        }
        _ => String::new(),
    };

    format!(
        r#"<section class="note-form">
  <h2>Add Care Note</h2>
  <p class="subtitle">Document your observations and care details</p>
  <form method="post" action="/dashboard/client/{client_id}/notes" class="stack">
    {prompt}
    <textarea name="note_text" rows="8" required placeholder="Enter your detailed notes here...">{text}</textarea>
    <span class="hint">{words} words</span>
    <button type="submit" class="primary">Add Note</button>
  </form>
</section>"#,
        text = escape(text),
        words = text.split_whitespace().count(),
    )
}

fn notes_table_html(view: &ClientView) -> String {
    let client_id = view.client.id;
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<section class="notes">
  <header class="row">
    <h2>Client Notes History <span class="pill">{} Notes</span></h2>
    <form method="get" action="/dashboard/client/{client_id}" class="filters">
      <input type="search" name="q" placeholder="Search notes..." value="{}" />
      <input type="hidden" name="sort" value="{}" />
      <button type="submit">Search</button>
    </form>
  </header>"#,
        view.total_notes,
        escape(view.search),
        view.sort.as_str()
    );

    if view.notes.items.is_empty() {
        html.push_str(r#"<p class="empty">No notes found.</p></section>"#);
        return html;
    }

    let toggle = format!(
        "/dashboard/client/{client_id}?q={}&sort={}",
        query_escape(view.search),
        view.sort.toggled().as_str()
    );
    let arrow = match view.sort {
        SortDirection::Asc => "&uarr;",
        SortDirection::Desc => "&darr;",
    };
    let _ = write!(
        html,
        r#"<table><thead><tr><th><a href="{}">Date {arrow}</a></th><th>Note</th><th>Sentiment</th><th>Emotions</th></tr></thead><tbody>"#,
        escape(&toggle)
    );

    for note in &view.notes.items {
        let _ = write!(
            html,
            r#"<tr><td>{}</td><td><details><summary>{}</summary><p>{}</p>{}</details></td><td><span class="{}">{}</span></td><td>{}</td></tr>"#,
            escape(&format_timestamp(&note.created_at)),
            escape(&excerpt(&note.note_text, 80)),
            escape(&note.note_text),
            note.ai_evaluated_notes
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| format!(r#"<p class="hint">AI evaluation: {}</p>"#, escape(v)))
                .unwrap_or_default(),
            sentiment_class(&note.sentiment),
            escape(&note.sentiment),
            escape(&emotion_tags(note)),
        );
    }
    html.push_str("</tbody></table>");

    let search = view.search;
    let sort = view.sort.as_str();
    html.push_str(&pagination_html(&view.notes, |page| {
        format!(
            "/dashboard/client/{client_id}?q={}&sort={sort}&page={page}",
            query_escape(search)
        )
    }));
    html.push_str("</section>");
    html
}

fn sentiment_class(sentiment: &str) -> &'static str {
    match sentiment.to_lowercase().as_str() {
        "positive" => "sentiment positive",
        "negative" => "sentiment negative",
        _ => "sentiment other",
    }
}

fn emotion_tags(note: &ClientNote) -> String {
    let Some(tags) = &note.emotion_tags else {
        return String::new();
    };
    tags.iter()
        .filter_map(|(name, value)| value.as_f64().map(|v| format!("{name} {:.0}%", v * 100.0)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let cut: String = text.chars().take(limit).collect();
    format!("{}...", cut.trim_end())
}

fn format_timestamp(value: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.format("%b %e, %Y %H:%M").to_string())
        .unwrap_or_else(|_| value.to_string())
}

pub fn render_new_client(form: &NewClient, error: Option<&str>) -> String {
    let banner = error
        .map(|message| format!(r#"<div class="toast error" role="alert">Failed to create client: {}</div>"#, escape(message)))
        .unwrap_or_default();

    let gender_options = choice_options(&GENDER_CHOICES, &form.gender, "Male");
    let status_options = choice_options(&CARE_STATUS_CHOICES, &form.care_status, "Active");

    let body = format!(
        r#"{nav}{banner}<main class="card">
  <header class="row">
    <div>
      <h1>New Client</h1>
      <p class="subtitle">Create a new care client record</p>
    </div>
    <a class="button" href="/dashboard">Cancel</a>
  </header>
  <form method="post" action="/dashboard/client/new" class="stack">
    <fieldset>
      <legend>Personal Details</legend>
      <label>First name * <input name="first_name" value="{first_name}" required /></label>
      <label>Last name * <input name="last_name" value="{last_name}" required /></label>
      <label>Date of birth * <input name="date_of_birth" type="date" value="{date_of_birth}" required /></label>
      <label>Gender * <select name="gender" required>{gender_options}</select></label>
    </fieldset>
    <fieldset>
      <legend>Contact Information</legend>
      <label>Address <input name="address" value="{address}" /></label>
      <label>Contact number <input name="contact_number" value="{contact_number}" /></label>
      <label>Emergency contact name <input name="emergency_contact_name" value="{emergency_contact_name}" /></label>
      <label>Emergency contact number <input name="emergency_contact_number" value="{emergency_contact_number}" /></label>
    </fieldset>
    <fieldset>
      <legend>Care Details</legend>
      <label>Care status * <select name="care_status" required>{status_options}</select></label>
      <label>Care notes <textarea name="care_notes" rows="4">{care_notes}</textarea></label>
    </fieldset>
    <button type="submit" class="primary">Create client</button>
  </form>
</main>"#,
        nav = nav_html(),
        first_name = escape(&form.first_name),
        last_name = escape(&form.last_name),
        date_of_birth = escape(&form.date_of_birth),
        address = escape(&form.address),
        contact_number = escape(&form.contact_number),
        emergency_contact_name = escape(&form.emergency_contact_name),
        emergency_contact_number = escape(&form.emergency_contact_number),
        care_notes = escape(&form.care_notes),
    );
    layout("New client", &body)
}

fn choice_options(choices: &[&str], selected: &str, fallback: &str) -> String {
    let selected = if selected.is_empty() { fallback } else { selected };
    choices
        .iter()
        .map(|choice| {
            let flag = if *choice == selected { " selected" } else { "" };
            format!(r#"<option value="{choice}"{flag}>{choice}</option>"#)
        })
        .collect()
}


const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} | Remote Care</title>
  <style>
    :root {
      --bg: #f9fafb;
      --ink: #111827;
      --muted: #6b7280;
      --accent: #4f46e5;
      --ok: #166534;
      --ok-bg: #f0fdf4;
      --err: #991b1b;
      --err-bg: #fee2e2;
      --warn: #d97706;
      --warn-bg: #fef3c7;
      --card: #ffffff;
      --shadow: 0 10px 15px -3px rgba(0, 0, 0, 0.1), 0 4px 6px -2px rgba(0, 0, 0, 0.05);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, "Segoe UI", sans-serif;
    }

    .topbar {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 12px 32px;
      background: white;
      border-bottom: 1px solid #e5e7eb;
    }

    .brand {
      font-size: 1.4rem;
      font-weight: 700;
      color: var(--accent);
      text-decoration: none;
    }

    .card {
      width: min(860px, 100%);
      margin: 32px auto;
      background: var(--card);
      border-radius: 12px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 24px;
    }

    .card.wide {
      width: min(1200px, 100%);
    }

    .card.narrow {
      width: min(420px, 100%);
    }

    .row {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
      flex-wrap: wrap;
    }

    h1, h2, h3, h4 {
      margin: 0;
    }

    .subtitle, .hint, .meta {
      margin: 0;
      color: var(--muted);
      font-size: 0.9rem;
    }

    .stack {
      display: grid;
      gap: 14px;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.9rem;
    }

    input, select, textarea {
      font: inherit;
      padding: 8px 10px;
      border: 1px solid #d1d5db;
      border-radius: 6px;
    }

    button, .button {
      font: inherit;
      padding: 8px 14px;
      border-radius: 6px;
      border: 1px solid #d1d5db;
      background: white;
      color: var(--ink);
      cursor: pointer;
      text-decoration: none;
    }

    .primary {
      background: var(--accent);
      border-color: var(--accent);
      color: white;
    }

    button.warn {
      background: var(--warn-bg);
      color: var(--warn);
    }

    button.link {
      border: none;
      color: var(--muted);
    }

    .filters {
      display: flex;
      gap: 8px;
      flex-wrap: wrap;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
      gap: 16px;
    }

    .client-card {
      display: grid;
      gap: 6px;
      padding: 16px;
      border: 1px solid #e5e7eb;
      border-radius: 10px;
      color: inherit;
      text-decoration: none;
    }

    .client-card .name {
      font-weight: 600;
    }

    .status, .sentiment, .pill {
      justify-self: start;
      padding: 2px 10px;
      border-radius: 999px;
      font-size: 0.8rem;
      background: #f3f4f6;
    }

    .status.active, .sentiment.positive {
      background: #dcfce7;
      color: var(--ok);
    }

    .status.inactive, .sentiment.negative {
      background: var(--err-bg);
      color: var(--err);
    }

    .status.review, .sentiment.other {
      background: var(--warn-bg);
      color: #92400e;
    }

    .pagination {
      display: flex;
      gap: 6px;
      justify-content: center;
    }

    .pagination a, .pagination span {
      padding: 6px 12px;
      border-radius: 6px;
      border: 1px solid #e5e7eb;
      text-decoration: none;
      color: inherit;
    }

    .pagination .current {
      background: var(--accent);
      color: white;
    }

    .details {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 12px;
    }

    .detail, .stat {
      display: grid;
      gap: 4px;
    }

    .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(4, 1fr);
      gap: 12px;
      text-align: center;
    }

    .value {
      font-weight: 600;
    }

    .sentiment-positive { color: #16a34a; }
    .sentiment-negative { color: #dc2626; }
    .sentiment-neutral { color: #2563eb; }
    .sentiment-uncategorized { color: var(--muted); }

    .charts {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
      gap: 16px;
    }

    figure {
      margin: 0;
      padding: 12px;
      background: var(--bg);
      border-radius: 10px;
      text-align: center;
    }

    .summary {
      padding: 16px;
      background: #eef2ff;
      border-radius: 10px;
      color: #4338ca;
    }

    .insights {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
      gap: 12px;
    }

    .insights ul {
      list-style: none;
      padding: 0;
      margin: 8px 0 0;
      background: white;
      border-radius: 8px;
    }

    .insights li {
      display: flex;
      justify-content: space-between;
      padding: 6px 10px;
      color: var(--ink);
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 10px;
      border-bottom: 1px solid #e5e7eb;
      vertical-align: top;
    }

    th a {
      color: inherit;
    }

    .banner, .toast {
      padding: 12px 16px;
      border-radius: 8px;
    }

    .banner.error, .toast.error {
      background: var(--err-bg);
      color: var(--err);
    }

    .toast {
      width: min(500px, 100%);
      margin: 16px auto 0;
      display: flex;
      justify-content: space-between;
      gap: 12px;
      box-shadow: var(--shadow);
    }

    .toast.ok {
      background: var(--ok-bg);
      color: var(--ok);
    }

    .toast.warn {
      display: block;
      margin: 0;
      background: white;
      border: 1px solid var(--warn-bg);
    }

    .toast .dismiss {
      border: none;
      background: transparent;
    }

    .empty {
      color: var(--muted);
      text-align: center;
    }

    .chart-label {
      font-size: 11px;
      fill: var(--muted);
    }
  </style>
</head>
<body>
{{BODY}}
  <script>
    document.querySelectorAll('.dismiss').forEach((button) => {
      button.addEventListener('click', () => {
        const toast = button.closest('.toast');
        if (toast) {
          toast.remove();
        }
      });
    });

    document.querySelectorAll('.toast.ok').forEach((toast) => {
      setTimeout(() => toast.remove(), 3000);
    });

    const svg = (tag, attrs) => {
      const el = document.createElementNS('http://www.w3.org/2000/svg', tag);
      Object.entries(attrs).forEach(([key, value]) => el.setAttribute(key, value));
      return el;
    };

    const renderPie = (chartEl, dataset) => {
      const cx = 110;
      const cy = 110;
      const r = 90;
      let angle = -Math.PI / 2;
      const total = dataset.data.reduce((acc, value) => acc + value, 0);
      if (total <= 0) {
        const text = svg('text', { class: 'chart-label', x: '50%', y: '50%', 'text-anchor': 'middle' });
        text.textContent = 'No data yet';
        chartEl.appendChild(text);
        return;
      }
      dataset.data.forEach((value, index) => {
        if (value <= 0) {
          return;
        }
        const sweep = (value / total) * Math.PI * 2;
        const end = angle + sweep;
        const large = sweep > Math.PI ? 1 : 0;
        const x1 = cx + r * Math.cos(angle);
        const y1 = cy + r * Math.sin(angle);
        const x2 = cx + r * Math.cos(end - 0.0001);
        const y2 = cy + r * Math.sin(end - 0.0001);
        chartEl.appendChild(svg('path', {
          d: `M ${cx} ${cy} L ${x1} ${y1} A ${r} ${r} 0 ${large} 1 ${x2} ${y2} Z`,
          fill: dataset.background_color[index],
          stroke: dataset.border_color[index]
        }));
        angle = end;
      });
      dataset.labels.forEach((label, index) => {
        const y = 30 + index * 22;
        chartEl.appendChild(svg('rect', { x: 220, y: y - 10, width: 12, height: 12, fill: dataset.background_color[index] }));
        const text = svg('text', { class: 'chart-label', x: 238, y });
        text.textContent = `${label} ${dataset.data[index].toFixed(1)}%`;
        chartEl.appendChild(text);
      });
    };

    const renderBars = (chartEl, dataset) => {
      if (!dataset.data.length) {
        const text = svg('text', { class: 'chart-label', x: '50%', y: '50%', 'text-anchor': 'middle' });
        text.textContent = 'No data yet';
        chartEl.appendChild(text);
        return;
      }
      const width = 600;
      const height = 260;
      const paddingX = 44;
      const paddingY = 34;
      const top = 16;
      const max = Math.max(...dataset.data, 1);
      const slot = (width - paddingX * 2) / dataset.data.length;
      const scaleY = (height - top - paddingY) / max;
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        const y = height - paddingY - value * scaleY;
        chartEl.appendChild(svg('line', { x1: paddingX, y1: y, x2: width - paddingX, y2: y, stroke: '#e5e7eb' }));
        const tick = svg('text', { class: 'chart-label', x: paddingX - 6, y: y + 4, 'text-anchor': 'end' });
        tick.textContent = `${value.toFixed(1)}%`;
        chartEl.appendChild(tick);
      }
      dataset.data.forEach((value, index) => {
        const x = paddingX + index * slot + slot * 0.15;
        const h = value * scaleY;
        chartEl.appendChild(svg('rect', {
          x,
          y: height - paddingY - h,
          width: slot * 0.7,
          height: h,
          fill: dataset.background_color[index],
          stroke: dataset.border_color[index]
        }));
        const label = svg('text', { class: 'chart-label', x: x + slot * 0.35, y: height - paddingY + 16, 'text-anchor': 'middle' });
        label.textContent = dataset.labels[index];
        chartEl.appendChild(label);
      });
    };

    const analyticsData = document.getElementById('analytics-data');
    if (analyticsData) {
      try {
        const charts = JSON.parse(analyticsData.textContent);
        renderPie(document.getElementById('sentiment-chart'), charts.sentiment_chart);
        renderBars(document.getElementById('emotion-chart'), charts.emotion_chart);
      } catch (err) {
        const banner = document.createElement('div');
        banner.className = 'banner error';
        banner.textContent = 'Failed to load analytics data';
        document.getElementById('analytics').appendChild(banner);
      }
    }
  </script>
</body>
</html>
"#;
