use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::types::{Coordinate, ProductId, SearchRadiusKm};
use crate::dto::products::{ProductDto, ProductIdDto};
use crate::forms::products::ProductForm;
use crate::forms::queries::{CategoryQuery, LocationPath, NearbyQuery, RegionPath, TopRatedQuery};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{error_response, message, respond, travel_policy, url_resolver};
use crate::services::ServiceResult;
use crate::services::products::{
    create_product as create_product_service, delete_product as delete_product_service,
    get_product as get_product_service, update_product as update_product_service,
};
use crate::services::query::{ProductListing, QueryEngine};
use crate::storage::LocalImageStorage;

fn listing_response(result: ServiceResult<Vec<ProductListing>>, empty: &str) -> HttpResponse {
    match result {
        Ok(items) if items.is_empty() => message(StatusCode::NOT_FOUND, empty),
        Ok(items) => respond(
            StatusCode::OK,
            "Products retrieved",
            items.into_iter().map(ProductDto::from).collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err),
    }
}

#[post("/create")]
pub async fn create_product(
    MultipartForm(form): MultipartForm<ProductForm>,
    repo: web::Data<DieselRepository>,
    storage: web::Data<LocalImageStorage>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let payload = match form.into_create_payload(config.max_upload_bytes) {
        Ok(payload) => payload,
        Err(e) => return error_response(e.into()),
    };

    match create_product_service(payload, repo.get_ref(), storage.get_ref()) {
        Ok(id) => respond(
            StatusCode::CREATED,
            "Product created",
            ProductIdDto::from(id),
        ),
        Err(err) => error_response(err),
    }
}

#[get("/")]
pub async fn list_products(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let resolver = url_resolver(&req, &config);
    let engine = QueryEngine::new(repo.get_ref(), &resolver, travel_policy(&config));

    match engine.all() {
        Ok(items) => respond(
            StatusCode::OK,
            "Products retrieved",
            items.into_iter().map(ProductDto::from).collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err),
    }
}

#[get("/kab_kota/{kab_kota}/{lat},{lon}")]
pub async fn products_by_region(
    req: HttpRequest,
    path: web::Path<RegionPath>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let (region, origin) = match path.into_inner().into_parts() {
        Ok(parts) => parts,
        Err(e) => return error_response(e.into()),
    };
    let resolver = url_resolver(&req, &config);
    let engine = QueryEngine::new(repo.get_ref(), &resolver, travel_policy(&config));

    listing_response(
        engine.by_region(region, origin),
        "No products found in this region",
    )
}

#[get("/category/{category}")]
pub async fn products_by_category(
    req: HttpRequest,
    category: web::Path<String>,
    query: web::Query<CategoryQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let search = match query.into_inner().into_search(category.into_inner()) {
        Ok(search) => search,
        Err(e) => return error_response(e.into()),
    };
    let resolver = url_resolver(&req, &config);
    let engine = QueryEngine::new(repo.get_ref(), &resolver, travel_policy(&config));

    listing_response(
        engine.by_category(search),
        "No products found in this category",
    )
}

#[get("/nearme/{lat},{lon}")]
pub async fn products_nearby(
    req: HttpRequest,
    path: web::Path<LocationPath>,
    query: web::Query<NearbyQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let origin = match Coordinate::try_from(path.into_inner()) {
        Ok(origin) => origin,
        Err(e) => return error_response(e.into()),
    };
    let radius = match SearchRadiusKm::try_from(query.into_inner()) {
        Ok(radius) => radius,
        Err(e) => return error_response(e.into()),
    };
    let resolver = url_resolver(&req, &config);
    let engine = QueryEngine::new(repo.get_ref(), &resolver, travel_policy(&config));

    listing_response(
        engine.nearby(origin, radius),
        "No products found within the given distance",
    )
}

#[get("/populer/{lat},{lon}")]
pub async fn products_top_rated(
    req: HttpRequest,
    path: web::Path<LocationPath>,
    query: web::Query<TopRatedQuery>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let search = match Coordinate::try_from(path.into_inner())
        .and_then(|origin| query.into_inner().into_search(origin))
    {
        Ok(search) => search,
        Err(e) => return error_response(e.into()),
    };
    let resolver = url_resolver(&req, &config);
    let engine = QueryEngine::new(repo.get_ref(), &resolver, travel_policy(&config));

    listing_response(engine.top_rated(search), "No popular products found")
}

#[get("/{id}")]
pub async fn show_product(
    req: HttpRequest,
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let id = match ProductId::new(id.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };
    let resolver = url_resolver(&req, &config);
    let engine = QueryEngine::new(repo.get_ref(), &resolver, travel_policy(&config));

    match get_product_service(&id, &engine) {
        Ok(listing) => respond(
            StatusCode::OK,
            "Product retrieved",
            ProductDto::from(listing),
        ),
        Err(err) => error_response(err),
    }
}

#[put("/{id}")]
pub async fn update_product(
    req: HttpRequest,
    id: web::Path<String>,
    MultipartForm(form): MultipartForm<ProductForm>,
    repo: web::Data<DieselRepository>,
    storage: web::Data<LocalImageStorage>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let payload = match form.into_update_payload(&id, config.max_upload_bytes) {
        Ok(payload) => payload,
        Err(e) => return error_response(e.into()),
    };
    let resolver = url_resolver(&req, &config);

    match update_product_service(payload, &resolver, repo.get_ref(), storage.get_ref()) {
        Ok(id) => respond(StatusCode::OK, "Product updated", ProductIdDto::from(id)),
        Err(err) => error_response(err),
    }
}

#[delete("/{id}")]
pub async fn delete_product(
    id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    storage: web::Data<LocalImageStorage>,
) -> impl Responder {
    let id = match ProductId::new(id.into_inner()) {
        Ok(id) => id,
        Err(e) => return error_response(e.into()),
    };

    match delete_product_service(&id, repo.get_ref(), storage.get_ref()) {
        Ok(()) => respond(StatusCode::OK, "Product deleted", ProductIdDto::from(id)),
        Err(err) => error_response(err),
    }
}
