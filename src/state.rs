use std::sync::Arc;

use coursekit_config::{ContentConfig, CorsConfig, JwtConfig, UploadConfig};
use coursekit_content::{ContentLoader, MarkdownRenderer};
use coursekit_core::file_storage::LocalFileStorage;
use coursekit_db::init_db_pool;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub content_config: ContentConfig,
    pub upload_config: UploadConfig,
    pub content: Arc<ContentLoader>,
    pub storage: Arc<LocalFileStorage>,
}

impl AppState {
    /// Builds the state around an existing pool; everything else comes from
    /// the given configs.
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        content_config: ContentConfig,
        upload_config: UploadConfig,
    ) -> Self {
        let renderer = Arc::new(MarkdownRenderer::with_repository(
            content_config.github_repository.clone(),
        ));
        let content = Arc::new(ContentLoader::new(
            content_config.docs_root.clone(),
            renderer,
        ));
        let storage = Arc::new(LocalFileStorage::with_max_size(
            upload_config.upload_dir.clone(),
            upload_config.base_url.clone(),
            upload_config.max_bytes,
        ));

        Self {
            db,
            jwt_config,
            cors_config,
            content_config,
            upload_config,
            content,
            storage,
        }
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        self.content.renderer()
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    Ok(AppState::new(
        init_db_pool().await?,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        ContentConfig::from_env(),
        UploadConfig::from_env(),
    ))
}

#[cfg(feature = "test-utils")]
impl AppState {
    /// Fixed JWT secret for tokens minted by tests.
    pub const TEST_JWT_SECRET: &'static str = "coursekit-test-secret";

    /// State with a known secret and content and uploads rooted at the given
    /// directories.
    pub fn for_tests(
        db: PgPool,
        docs_root: std::path::PathBuf,
        upload_dir: std::path::PathBuf,
    ) -> Self {
        Self::new(
            db,
            JwtConfig {
                secret: Self::TEST_JWT_SECRET.to_string(),
                access_token_expiry: 3600,
            },
            CorsConfig::default(),
            ContentConfig {
                docs_root,
                site_name: "Coursekit".to_string(),
                github_repository: Some("coursekit/coursekit".to_string()),
            },
            UploadConfig {
                upload_dir,
                base_url: "http://localhost:3000/files".to_string(),
                max_bytes: 1024 * 1024,
            },
        )
    }
}
