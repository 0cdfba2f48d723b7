use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Coordinates every geocoded address resolves to.
pub const GEOCODE_LAT: f64 = 48.8584;
pub const GEOCODE_LNG: f64 = 2.2945;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub place_id: String,
    pub name: String,
    pub geometry: Geometry,
    pub formatted_address: String,
    pub types: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Location,
}

/// Body of a place-add request. Unknown and placeholder fields are ignored.
#[derive(Deserialize)]
pub struct AddPlace {
    pub name: String,
    pub location: Location,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub types: Vec<String>,
}

pub type Db = Arc<RwLock<HashMap<String, Place>>>;

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    places: Db,
}

type Params = Query<HashMap<String, String>>;

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        places: Arc::new(RwLock::new(HashMap::new())),
    };
    Router::new()
        .route("/maps/api/geocode/{format}", get(geocode))
        .route("/legacy/geocode/{format}", get(legacy_geocode))
        .route("/maps/api/place/add/json", post(add_place))
        .route("/maps/api/place/details/{format}", get(place_details))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn geocode(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Query(params): Params,
) -> Response {
    if !authorized(&state, &params) {
        return reply(&format, "GeocodeResponse", StatusCode::FORBIDDEN, denied());
    }
    let body = match params.get("address").filter(|a| !a.is_empty()) {
        Some(address) => {
            let components = params.get("components").map(String::as_str).unwrap_or("");
            json!({
                "results": [{
                    "address_components": parse_components(components),
                    "formatted_address": address,
                    "geometry": {
                        "location": {"lat": GEOCODE_LAT, "lng": GEOCODE_LNG},
                        "location_type": "ROOFTOP"
                    },
                    "place_id": "mock-geocode-place",
                    "types": ["street_address"]
                }],
                "status": "OK"
            })
        }
        None => json!({"results": [], "status": "INVALID_REQUEST"}),
    };
    reply(&format, "GeocodeResponse", StatusCode::OK, body)
}

async fn legacy_geocode(Path(format): Path<String>, RawQuery(query): RawQuery) -> Redirect {
    let query = query.unwrap_or_default();
    Redirect::permanent(&format!("/maps/api/geocode/{format}?{query}"))
}

async fn add_place(
    State(state): State<AppState>,
    Query(params): Params,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&state, &params) {
        return (StatusCode::FORBIDDEN, Json(denied()));
    }
    let input = match serde_json::from_value::<AddPlace>(body) {
        Ok(input) if !input.name.is_empty() => input,
        _ => return (StatusCode::OK, Json(json!({"status": "INVALID_REQUEST"}))),
    };
    let place = Place {
        place_id: Uuid::new_v4().to_string(),
        name: input.name,
        geometry: Geometry {
            location: input.location,
        },
        formatted_address: input.address,
        types: input.types,
    };
    let place_id = place.place_id.clone();
    state.places.write().await.insert(place_id.clone(), place);
    tracing::info!(%place_id, "place added");
    (
        StatusCode::OK,
        Json(json!({"place_id": place_id, "scope": "APP", "status": "OK"})),
    )
}

async fn place_details(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Query(params): Params,
) -> Response {
    if !authorized(&state, &params) {
        return reply(&format, "PlaceDetailsResponse", StatusCode::FORBIDDEN, denied());
    }
    let body = match params.get("placeid").filter(|id| !id.is_empty()) {
        None => json!({"status": "INVALID_REQUEST"}),
        Some(id) => match state.places.read().await.get(id) {
            Some(place) => json!({"result": place, "status": "OK"}),
            None => json!({"status": "NOT_FOUND"}),
        },
    };
    reply(&format, "PlaceDetailsResponse", StatusCode::OK, body)
}

fn authorized(state: &AppState, params: &HashMap<String, String>) -> bool {
    params.get("key").map(String::as_str) == Some(&*state.api_key)
}

fn denied() -> Value {
    json!({
        "error_message": "The provided API key is invalid.",
        "results": [],
        "status": "REQUEST_DENIED"
    })
}

/// Split a `name:value|name:value` filter into address components.
pub fn parse_components(raw: &str) -> Vec<Value> {
    raw.split('|')
        .filter_map(|part| part.split_once(':'))
        .map(|(kind, value)| json!({"short_name": value, "types": [kind]}))
        .collect()
}

fn reply(format: &str, root: &str, status: StatusCode, body: Value) -> Response {
    match format {
        "json" => (status, Json(body)).into_response(),
        "xml" => {
            let code = body["status"].as_str().unwrap_or_default();
            let xml = format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<{root}>\n <status>{code}</status>\n</{root}>\n"
            );
            (status, [(header::CONTENT_TYPE, "application/xml")], xml).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
