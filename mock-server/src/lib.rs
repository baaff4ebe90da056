use std::{
    collections::{BTreeMap, VecDeque},
    sync::Arc,
};

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub nombre: String,
    pub precio: f64,
    pub categoria: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disponible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productor: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creado_en: Option<String>,
}

/// Body of POST and PUT: every product field except `id`.
#[derive(Deserialize)]
pub struct NewProduct {
    pub nombre: String,
    pub precio: f64,
    pub categoria: String,
    pub disponible: Option<bool>,
    pub productor: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct ProductPatch {
    pub nombre: Option<String>,
    pub precio: Option<f64>,
    pub categoria: Option<String>,
    pub disponible: Option<bool>,
}

/// Queue `count` canned responses with `status` ahead of the next requests.
#[derive(Deserialize)]
pub struct FaultPlan {
    pub status: u16,
    #[serde(default = "one")]
    pub count: usize,
}

fn one() -> usize {
    1
}

#[derive(Default)]
pub struct Store {
    products: BTreeMap<i64, Product>,
    next_id: i64,
    faults: VecDeque<StatusCode>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let catalog = Router::new()
        .route("/productos", get(list_products).post(create_product))
        .route(
            "/productos/{id}",
            get(get_product)
                .put(replace_product)
                .patch(update_product)
                .delete(delete_product),
        )
        .route_layer(middleware::from_fn_with_state(db.clone(), inject_faults));
    Router::new()
        .route("/_faults", post(queue_faults).delete(clear_faults))
        .merge(catalog)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn inject_faults(State(db): State<Db>, request: Request, next: Next) -> Response {
    let fault = db.write().await.faults.pop_front();
    match fault {
        Some(status) => {
            warn!(%status, path = %request.uri().path(), "injecting fault");
            (status, status.canonical_reason().unwrap_or("injected fault")).into_response()
        }
        None => next.run(request).await,
    }
}

async fn queue_faults(
    State(db): State<Db>,
    Json(plan): Json<FaultPlan>,
) -> Result<StatusCode, StatusCode> {
    let status = StatusCode::from_u16(plan.status).map_err(|_| StatusCode::BAD_REQUEST)?;
    let mut store = db.write().await;
    store
        .faults
        .extend(std::iter::repeat(status).take(plan.count));
    info!(%status, count = plan.count, "queued faults");
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_faults(State(db): State<Db>) -> StatusCode {
    db.write().await.faults.clear();
    StatusCode::NO_CONTENT
}

async fn list_products(State(db): State<Db>) -> Json<Vec<Product>> {
    let store = db.read().await;
    Json(store.products.values().cloned().collect())
}

async fn create_product(
    State(db): State<Db>,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), (StatusCode, String)> {
    check_price(input.precio)?;
    let mut store = db.write().await;
    if store.products.values().any(|p| p.nombre == input.nombre) {
        return Err((
            StatusCode::CONFLICT,
            format!("product '{}' already exists", input.nombre),
        ));
    }
    store.next_id += 1;
    let product = Product {
        id: store.next_id,
        nombre: input.nombre,
        precio: input.precio,
        categoria: input.categoria,
        disponible: input.disponible,
        productor: input.productor,
        creado_en: None,
    };
    store.products.insert(product.id, product.clone());
    info!(id = product.id, "created product");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Product>, StatusCode> {
    let store = db.read().await;
    store.products.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<NewProduct>,
) -> Result<Json<Product>, (StatusCode, String)> {
    check_price(input.precio)?;
    let mut store = db.write().await;
    let product = store
        .products
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, String::new()))?;
    product.nombre = input.nombre;
    product.precio = input.precio;
    product.categoria = input.categoria;
    product.disponible = input.disponible;
    product.productor = input.productor;
    Ok(Json(product.clone()))
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ProductPatch>,
) -> Result<Json<Product>, (StatusCode, String)> {
    if let Some(precio) = input.precio {
        check_price(precio)?;
    }
    let mut store = db.write().await;
    let product = store
        .products
        .get_mut(&id)
        .ok_or((StatusCode::NOT_FOUND, String::new()))?;
    if let Some(nombre) = input.nombre {
        product.nombre = nombre;
    }
    if let Some(precio) = input.precio {
        product.precio = precio;
    }
    if let Some(categoria) = input.categoria {
        product.categoria = categoria;
    }
    if let Some(disponible) = input.disponible {
        product.disponible = Some(disponible);
    }
    Ok(Json(product.clone()))
}

async fn delete_product(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store
        .products
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

fn check_price(precio: f64) -> Result<(), (StatusCode, String)> {
    if precio > 0.0 {
        Ok(())
    } else {
        Err((
            StatusCode::BAD_REQUEST,
            format!("precio must be greater than 0, got {precio}"),
        ))
    }
}
