//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{
    BookingService, CatalogService, UserService, VehicleService, WorkOrderService,
};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, ListParams, PaginatedResponse};
use crate::interfaces::http::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::interfaces::http::modules::{
    auth, bookings, health, metrics, request_id, services, users, vehicles, work_orders,
};
use crate::interfaces::http::state::AppState;

/// Everything the router needs from the outside.
pub struct ApiDependencies {
    pub db: DatabaseConnection,
    pub repos: Arc<dyn RepositoryProvider>,
    pub jwt_config: JwtConfig,
    pub bcrypt_cost: u32,
    pub default_page_limit: u64,
    /// `None` leaves `/metrics` unrouted (no global recorder installed).
    pub metrics_handle: Option<PrometheusHandle>,
}

impl ApiDependencies {
    pub fn app_state(&self) -> AppState {
        AppState {
            users: Arc::new(UserService::new(
                Arc::clone(&self.repos),
                self.jwt_config.clone(),
                self.bcrypt_cost,
            )),
            catalog: Arc::new(CatalogService::new(Arc::clone(&self.repos))),
            vehicles: Arc::new(VehicleService::new(Arc::clone(&self.repos))),
            bookings: Arc::new(BookingService::new(Arc::clone(&self.repos))),
            work_orders: Arc::new(WorkOrderService::new(Arc::clone(&self.repos))),
            default_limit: self.default_page_limit,
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::logout,
        auth::get_current_user,
        auth::update_profile,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        // Services
        services::list_services,
        services::get_service,
        services::create_service,
        services::update_service,
        services::delete_service,
        // Vehicles
        vehicles::list_vehicles,
        vehicles::get_vehicle,
        vehicles::create_vehicle,
        vehicles::update_vehicle,
        vehicles::delete_vehicle,
        // Bookings
        bookings::list_bookings,
        bookings::get_booking,
        bookings::create_booking,
        bookings::update_booking_status,
        // Work orders
        work_orders::list_work_orders,
        work_orders::get_work_order,
        work_orders::create_from_booking,
        work_orders::assign_mechanic,
        work_orders::update_work_order_status,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginatedResponse<users::UserDto>,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RegisterRequest,
            auth::UpdateProfileRequest,
            users::UserDto,
            users::CreateUserRequest,
            services::ServiceOfferingDto,
            services::CreateServiceOfferingRequest,
            services::UpdateServiceOfferingRequest,
            vehicles::VehicleDto,
            vehicles::CreateVehicleRequest,
            vehicles::UpdateVehicleRequest,
            bookings::BookingDto,
            bookings::CreateBookingRequest,
            bookings::UpdateStatusRequest,
            bookings::RowsAffected,
            work_orders::WorkOrderDto,
            work_orders::WorkOrderLineDto,
            work_orders::AssignMechanicRequest,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Registration, login (JWT), logout and profile"),
        (name = "Users", description = "Staff administration of user accounts"),
        (name = "Services", description = "Service catalog"),
        (name = "Vehicles", description = "Customer vehicles"),
        (name = "Bookings", description = "Service bookings and their status lifecycle"),
        (name = "Work Orders", description = "Work orders derived from confirmed bookings"),
    ),
    info(
        title = "Workshop Service API",
        version = "1.0.0",
        description = "REST API for vehicle workshop bookings and work orders",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(deps: ApiDependencies) -> Router {
    let state = deps.app_state();
    let auth_state = AuthState {
        users: Arc::clone(&state.users),
    };
    let require_auth = || middleware::from_fn_with_state(auth_state.clone(), auth_middleware);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register));

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::get_current_user).put(auth::update_profile))
        .layer(require_auth());

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}", get(users::get_user))
        .layer(require_auth());

    // Catalog reads are public, writes go through auth + admin
    let service_public_routes = Router::new()
        .route("/", get(services::list_services))
        .route("/{id}", get(services::get_service));
    let service_admin_routes = Router::new()
        .route("/", post(services::create_service))
        .route(
            "/{id}",
            put(services::update_service).delete(services::delete_service),
        )
        .layer(middleware::from_fn(admin_middleware))
        .layer(require_auth());

    let vehicle_routes = Router::new()
        .route("/", get(vehicles::list_vehicles).post(vehicles::create_vehicle))
        .route(
            "/{id}",
            get(vehicles::get_vehicle)
                .put(vehicles::update_vehicle)
                .delete(vehicles::delete_vehicle),
        )
        .layer(require_auth());

    let booking_routes = Router::new()
        .route("/", get(bookings::list_bookings).post(bookings::create_booking))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/status", put(bookings::update_booking_status))
        .layer(require_auth());

    let work_order_routes = Router::new()
        .route("/", get(work_orders::list_work_orders))
        .route(
            "/from-booking/{booking_id}",
            post(work_orders::create_from_booking),
        )
        .route("/{id}", get(work_orders::get_work_order))
        .route("/{id}/assign-mechanic", put(work_orders::assign_mechanic))
        .route("/{id}/status", put(work_orders::update_work_order_status))
        .layer(require_auth());

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/auth", auth_protected_routes)
        .nest("/users", user_routes)
        .nest("/services", service_public_routes)
        .nest("/services", service_admin_routes)
        .nest("/vehicles", vehicle_routes)
        .nest("/bookings", booking_routes)
        .nest("/work-orders", work_order_routes)
        .with_state(state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: deps.db.clone(),
            started_at: Arc::new(Instant::now()),
        });

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1", api);

    if let Some(handle) = deps.metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::Service;

    use crate::domain::{Booking, BookingStatus};
    use crate::infrastructure::database::repositories::testing::{seed_offering, test_db};
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;

    const ADMIN_EMAIL: &str = "admin@workshop.local";
    const ADMIN_PASSWORD: &str = "admin-password";

    struct TestApp {
        router: Router,
        repos: Arc<SeaOrmRepositoryProvider>,
    }

    impl TestApp {
        async fn new() -> Self {
            let db = test_db().await;
            let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
            let deps = ApiDependencies {
                db,
                repos: repos.clone(),
                jwt_config: JwtConfig::default(),
                bcrypt_cost: 4,
                default_page_limit: 10,
                metrics_handle: None,
            };
            deps.app_state()
                .users
                .ensure_default_admin("Admin", ADMIN_EMAIL, ADMIN_PASSWORD)
                .await
                .unwrap();
            Self {
                router: create_api_router(deps),
                repos,
            }
        }

        async fn send(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().call(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }

        async fn login(&self, email: &str, password: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/v1/auth/login",
                    None,
                    Some(json!({ "email": email, "password": password })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            body["data"]["token"].as_str().unwrap().to_string()
        }

        async fn register_customer(&self, email: &str) -> (String, String) {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/v1/auth/register",
                    None,
                    Some(json!({ "name": "Budi", "email": email, "password": "customer-pw" })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            let id = body["data"]["id"].as_str().unwrap().to_string();
            (id, self.login(email, "customer-pw").await)
        }

        async fn create_vehicle(&self, token: &str, plate: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/v1/vehicles",
                    Some(token),
                    Some(json!({
                        "license_plate": plate,
                        "brand": "toyota",
                        "model": "avanza",
                        "year": 2019
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body["data"]["id"].as_str().unwrap().to_string()
        }
    }

    fn tomorrow() -> String {
        (Utc::now() + Duration::days(1)).to_rfc3339()
    }

    #[tokio::test]
    async fn booking_walks_through_its_lifecycle() {
        let app = TestApp::new().await;
        let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let (_, customer) = app.register_customer("budi@example.com").await;
        let vehicle_id = app.create_vehicle(&customer, "b 1234 xyz").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/services",
                Some(&admin),
                Some(json!({ "name": "oil change", "price": "50.00" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let service_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = app
            .send(
                Method::POST,
                "/api/v1/bookings",
                Some(&customer),
                Some(json!({
                    "vehicle_id": vehicle_id,
                    "booking_date": tomorrow(),
                    "service_ids": [service_id, "does-not-exist"]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["status"], "pending");
        assert_eq!(body["data"]["services"].as_array().unwrap().len(), 1);
        let booking_uri = format!("/api/v1/bookings/{}/status", body["data"]["id"].as_str().unwrap());

        let (status, _) = app
            .send(Method::PUT, &booking_uri, Some(&customer), Some(json!({ "status": "on_progress" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        for next in ["on_progress", "completed"] {
            let (status, body) = app
                .send(Method::PUT, &booking_uri, Some(&admin), Some(json!({ "status": next })))
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            assert_eq!(body["data"]["rows_affected"], 1);
        }

        let (status, _) = app
            .send(Method::PUT, &booking_uri, Some(&admin), Some(json!({ "status": "cancelled" })))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .send(Method::PUT, &booking_uri, Some(&admin), Some(json!({ "status": "archived" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn work_order_from_confirmed_booking() {
        let app = TestApp::new().await;
        let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        let (customer_id, customer) = app.register_customer("sari@example.com").await;
        let vehicle_id = app.create_vehicle(&customer, "d 42 ab").await;
        let oil = seed_offering(&*app.repos, "oil change", Decimal::new(12050, 2)).await;
        let wash = seed_offering(&*app.repos, "car wash", Decimal::new(50, 0)).await;

        let mut booking = Booking::new(
            &customer_id,
            &vehicle_id,
            Utc::now() + Duration::days(3),
            None,
            vec![oil, wash],
        );
        booking.status = BookingStatus::Confirmed;
        app.repos
            .bookings()
            .create(&booking, &booking.booked_services())
            .await
            .unwrap();

        let uri = format!("/api/v1/work-orders/from-booking/{}", booking.id);
        let (status, _) = app.send(Method::POST, &uri, Some(&customer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app.send(Method::POST, &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["status"], "open");
        assert_eq!(body["data"]["total"], "170.50");
        assert_eq!(body["data"]["services"].as_array().unwrap().len(), 2);

        let (status, body) = app
            .send(Method::GET, "/api/v1/work-orders", Some(&customer), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
    }

    #[tokio::test]
    async fn protected_routes_require_a_live_token() {
        let app = TestApp::new().await;

        let (status, body) = app.send(Method::GET, "/api/v1/bookings", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = app
            .send(Method::GET, "/api/v1/bookings", Some("not-a-jwt"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, token) = app.register_customer("rina@example.com").await;
        let (status, _) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.send(Method::POST, "/api/v1/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = app.send(Method::GET, "/api/v1/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn catalog_reads_are_public_and_writes_admin_only() {
        let app = TestApp::new().await;
        let (_, customer) = app.register_customer("joko@example.com").await;

        let (status, body) = app.send(Method::GET, "/api/v1/services", None, None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["total"], 0);

        let (status, _) = app
            .send(
                Method::POST,
                "/api/v1/services",
                Some(&customer),
                Some(json!({ "name": "tune up", "price": "10" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn list_rejects_unknown_sort_column() {
        let app = TestApp::new().await;
        let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

        let (status, body) = app
            .send(Method::GET, "/api/v1/bookings?order_by=password", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _) = app
            .send(Method::GET, "/api/v1/bookings?order_by=booking_date&page=0", Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn far_out_of_range_page_is_empty_not_an_error() {
        let app = TestApp::new().await;
        seed_offering(&*app.repos, "oil change", Decimal::new(50, 0)).await;

        for uri in [
            "/api/v1/services?page=9223372036854775807&limit=100",
            "/api/v1/services?page=1152921504606846976&limit=10",
        ] {
            let (status, body) = app.send(Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::OK, "{uri}: {body}");
            assert_eq!(body["total"], 1);
            assert!(body["data"].as_array().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let app = TestApp::new().await;
        seed_offering(&*app.repos, "oil change", Decimal::new(50, 0)).await;
        seed_offering(&*app.repos, "100% wash", Decimal::new(20, 0)).await;

        let (status, body) = app.send(Method::GET, "/api/v1/services?search=_", None, None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["total"], 0);

        let (status, body) = app.send(Method::GET, "/api/v1/services?search=%25", None, None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["name"], "100% Wash");
    }

    #[tokio::test]
    async fn health_reports_database() {
        let app = TestApp::new().await;
        let (status, body) = app.send(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "ok");
    }
}
