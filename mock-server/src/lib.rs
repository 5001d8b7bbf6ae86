use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const PAGE_SIZE: usize = 20;
pub const NOTHING_HERE: &str = "There is nothing here";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: Location,
    pub location: Location,
    pub image: String,
    pub episode: Vec<String>,
    pub url: String,
    pub created: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Info {
    pub count: usize,
    pub pages: usize,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: Info,
    pub results: Vec<Character>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CharacterQuery {
    pub page: Option<usize>,
    pub name: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone)]
struct AppState {
    base_url: Arc<str>,
    characters: Arc<Vec<Character>>,
}

/// Router serving `/character` as if mounted at `base_url`. Absolute links in
/// the payload (`next`, `image`, `episode`, ...) point back at `base_url`.
pub fn app(base_url: &str) -> Router {
    let base_url = base_url.trim_end_matches('/');
    let state = AppState {
        base_url: base_url.into(),
        characters: Arc::new(seed(base_url)),
    };
    Router::new()
        .route("/character", get(list_characters))
        .route("/character/avatar/{file}", get(avatar))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    let base_url = format!("http://{}", listener.local_addr()?);
    axum::serve(listener, app(&base_url)).await
}

async fn list_characters(
    State(state): State<AppState>,
    Query(query): Query<CharacterQuery>,
) -> Response {
    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_lowercase);
    let status = query.status.as_deref().filter(|s| !s.is_empty());

    let matches: Vec<&Character> = state
        .characters
        .iter()
        .filter(|c| name.as_ref().is_none_or(|n| c.name.to_lowercase().contains(n)))
        .filter(|c| status.is_none_or(|s| c.status.eq_ignore_ascii_case(s)))
        .collect();

    let count = matches.len();
    let page = query.page.unwrap_or(1).max(1);
    let pages = count.div_ceil(PAGE_SIZE);
    debug!(page, pages, count, ?name, ?status, "list characters");
    if page > pages {
        return not_found();
    }

    let results = matches
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .cloned()
        .collect::<Vec<_>>();

    let info = Info {
        count,
        pages,
        next: (page < pages).then(|| page_url(&state.base_url, page + 1, &query)),
        prev: (page > 1).then(|| page_url(&state.base_url, page - 1, &query)),
    };
    Json(CharacterPage { info, results }).into_response()
}

async fn avatar(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    let known = file
        .strip_suffix(".jpeg")
        .and_then(|id| id.parse::<i64>().ok())
        .filter(|id| state.characters.iter().any(|c| c.id == *id));
    match known {
        Some(id) => {
            let mut body = vec![0xFF, 0xD8, 0xFF, 0xE0];
            body.extend_from_slice(id.to_string().as_bytes());
            body.extend_from_slice(&[0xFF, 0xD9]);
            ([(header::CONTENT_TYPE, "image/jpeg")], body).into_response()
        }
        None => not_found(),
    }
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: NOTHING_HERE.to_string(),
        }),
    )
        .into_response()
}

fn page_url(base_url: &str, page: usize, query: &CharacterQuery) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    params.append_pair("page", &page.to_string());
    if let Some(name) = query.name.as_deref().filter(|n| !n.trim().is_empty()) {
        params.append_pair("name", name.trim());
    }
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        params.append_pair("status", status);
    }
    format!("{base_url}/character?{}", params.finish())
}

const ROSTER: &[(&str, &str, &str, &str)] = &[
    ("Rick Sanchez", "Alive", "Human", "Male"),
    ("Morty Smith", "Alive", "Human", "Male"),
    ("Summer Smith", "Alive", "Human", "Female"),
    ("Beth Smith", "Alive", "Human", "Female"),
    ("Jerry Smith", "Alive", "Human", "Male"),
    ("Abadango Cluster Princess", "Alive", "Alien", "Female"),
    ("Abradolf Lincler", "unknown", "Human", "Male"),
    ("Adjudicator Rick", "Dead", "Human", "Male"),
    ("Agency Director", "Dead", "Human", "Male"),
    ("Alan Rails", "Dead", "Human", "Male"),
    ("Albert Einstein", "Dead", "Human", "Male"),
    ("Alexander", "Dead", "Human", "Male"),
    ("Alien Googah", "unknown", "Alien", "unknown"),
    ("Alien Morty", "unknown", "Alien", "Male"),
    ("Alien Rick", "unknown", "Alien", "Male"),
    ("Amish Cyborg", "Dead", "Alien", "Male"),
    ("Annie", "Alive", "Human", "Female"),
    ("Antenna Morty", "Alive", "Human", "Male"),
    ("Antenna Rick", "unknown", "Human", "Male"),
    ("Ants in my Eyes Johnson", "unknown", "Human", "Male"),
    ("Aqua Morty", "unknown", "Humanoid", "Male"),
    ("Aqua Rick", "unknown", "Humanoid", "Male"),
    ("Arcade Alien", "unknown", "Alien", "Male"),
    ("Armagheadon", "Alive", "Alien", "Male"),
    ("Armothy", "Dead", "unknown", "Male"),
    ("Arthricia", "Alive", "Alien", "Female"),
    ("Artist Morty", "Alive", "Human", "Male"),
    ("Attila Starwar", "Alive", "Human", "Male"),
    ("Baby Legs", "Alive", "Human", "Male"),
    ("Baby Poopybutthole", "Alive", "Poopybutthole", "Male"),
    ("Baby Wizard", "Dead", "Alien", "Male"),
    ("Bearded Lady", "Dead", "Alien", "Female"),
    ("Beebo", "Dead", "Alien", "Male"),
    ("Benjamin", "Alive", "Poopybutthole", "Male"),
    ("Bepisian", "Alive", "Alien", "unknown"),
    ("Beta-Seven", "Alive", "Alien", "Genderless"),
    ("Beth Sanchez", "Alive", "Human", "Female"),
    ("Beth's Mytholog", "Dead", "Mythological Creature", "Female"),
    ("Big Head Morty", "unknown", "Human", "Male"),
    ("Big Morty", "Dead", "Human", "Male"),
    ("Birdperson", "Dead", "Alien", "Male"),
    ("Black Rick", "Alive", "Human", "Male"),
];

fn seed(base_url: &str) -> Vec<Character> {
    ROSTER
        .iter()
        .zip(1i64..)
        .map(|(&(name, status, species, gender), id)| Character {
            id,
            name: name.to_string(),
            status: status.to_string(),
            species: species.to_string(),
            kind: String::new(),
            gender: gender.to_string(),
            origin: Location {
                name: "Earth (C-137)".to_string(),
                url: format!("{base_url}/location/1"),
            },
            location: Location {
                name: "Citadel of Ricks".to_string(),
                url: format!("{base_url}/location/3"),
            },
            image: format!("{base_url}/character/avatar/{id}.jpeg"),
            episode: (1..=id % 3 + 1)
                .map(|e| format!("{base_url}/episode/{e}"))
                .collect(),
            url: format!("{base_url}/character/{id}"),
            created: "2017-11-04T18:48:46.250Z".to_string(),
        })
        .collect()
}
