use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::config::admin_user_conf::AdminUserConfig;
use crate::config::app_conf::AppConfig;
use crate::config::jwt_conf::JwtConfig;
use crate::config::mongo_conf::MongoConfig;
use crate::middlewares::auth_middleware::AuthState;
use crate::model::user::ROLE_ADMIN;
use crate::repository::book_repo::MongoBookRepository;
use crate::repository::review_repo::MongoReviewRepository;
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::router::auth_router::auth_router;
use crate::router::book_router::book_router;
use crate::router::review_router::review_router;
use crate::router::user_router::user_router;
use crate::service::book_service::BookServiceImpl;
use crate::service::review_service::ReviewServiceImpl;
use crate::service::user_service::UserServiceImpl;
use crate::util::jwt::JwtTokenUtilsImpl;

pub struct App {
    config: AppConfig,
    router: Router,
    pub user_service: Arc<UserServiceImpl>,
    pub book_service: Arc<BookServiceImpl>,
    pub review_service: Arc<ReviewServiceImpl>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");

        let user_repo = Arc::new(
            UserRepositoryImpl::new(&mongo_config)
                .await
                .expect("User repo error"),
        );
        let book_repo = Arc::new(
            MongoBookRepository::new(&mongo_config)
                .await
                .expect("Book repo error"),
        );
        let review_repo = Arc::new(
            MongoReviewRepository::new(&mongo_config)
                .await
                .expect("Review repo error"),
        );

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let user_service = Arc::new(UserServiceImpl::new(user_repo.clone(), jwt_utils.clone()));
        let book_service = Arc::new(BookServiceImpl::new(
            book_repo.clone(),
            review_repo.clone(),
            user_repo.clone(),
        ));
        let review_service = Arc::new(ReviewServiceImpl::new(
            review_repo,
            book_repo,
            user_repo.clone(),
        ));

        let auth_state = Arc::new(AuthState {
            jwt_utils,
            user_repo,
        });

        let router = Router::new()
            .merge(auth_router(user_service.clone()))
            .merge(user_router(user_service.clone(), auth_state.clone()))
            .merge(book_router(book_service.clone(), auth_state.clone()))
            .merge(review_router(review_service.clone(), auth_state))
            .route("/health", get(|| async { "OK" }))
            // The browser client is served from another origin.
            .layer(CorsLayer::permissive());

        let app = App {
            config,
            router,
            user_service,
            book_service,
            review_service,
        };
        app.create_first_admin_user().await;
        app
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(
            self.config.host.parse().expect("Invalid host"),
            self.config.port,
        );
        info!("🚀 Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }

    async fn create_first_admin_user(&self) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };

        match self
            .user_service
            .user_repo
            .find_by_email(&admin_conf.email)
            .await
        {
            Ok(Some(_)) => {
                info!("Admin user already exists, skipping creation.");
                return;
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to check for existing admin user: {e}");
                return;
            }
        }

        match self
            .user_service
            .create_user(
                admin_conf.name,
                admin_conf.email,
                admin_conf.password,
                ROLE_ADMIN,
            )
            .await
        {
            Ok(_) => info!("First admin user created."),
            Err(e) => error!("Failed to create admin user: {e}"),
        }
    }
}
