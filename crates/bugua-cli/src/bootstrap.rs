//! Wires configuration, stores, the oracle and capture together.

use anyhow::{Context, Result};
use bugua_application::{ChatSession, DivinationUseCase, RecordsService};
use bugua_core::capture::{BoardCapture, NoopCapture};
use bugua_core::config::AppConfig;
use bugua_core::{CacheKey, DivinationResult};
use bugua_infrastructure::{BuguaPaths, ConfigService, Stores, SvgBoardCapture, build_stores};
use bugua_interaction::{Agent, agent_from_config};
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppBootstrap {
    pub paths: BuguaPaths,
    pub config_path: PathBuf,
    pub config: AppConfig,
    pub stores: Stores,
    pub agent: Arc<dyn Agent>,
    pub capture: Arc<dyn BoardCapture>,
}

impl AppBootstrap {
    pub fn paths(config_dir: Option<PathBuf>) -> BuguaPaths {
        match config_dir {
            Some(dir) => BuguaPaths::with_config_dir(dir),
            None => BuguaPaths::new(),
        }
    }

    pub fn initialize(paths: BuguaPaths) -> Result<Self> {
        let config_service = ConfigService::new(paths.clone());
        let config_path = match config_service.ensure_config_file() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("[Bootstrap] Could not create config template: {}", e);
                config_service
                    .config_path()
                    .context("Failed to resolve config path")?
            }
        };
        let config = config_service
            .load()
            .with_context(|| format!("Failed to load {}", config_path.display()))?;

        let stores = build_stores(&config, &paths).context("Failed to open record store")?;
        tracing::info!("[Bootstrap] Storage backend: {}", stores.backend);

        let agent = agent_from_config(&config);
        let capture: Arc<dyn BoardCapture> = if config.capture.enabled {
            Arc::new(SvgBoardCapture::new())
        } else {
            Arc::new(NoopCapture)
        };

        Ok(Self {
            paths,
            config_path,
            config,
            stores,
            agent,
            capture,
        })
    }

    pub fn divination_usecase(&self) -> DivinationUseCase {
        DivinationUseCase::from_stores(&self.stores, self.agent.clone(), self.capture.clone())
    }

    pub fn records_service(&self) -> RecordsService {
        RecordsService::from_stores(&self.stores)
    }

    pub fn chat_session(&self, key: CacheKey, result: DivinationResult) -> ChatSession {
        ChatSession::new(
            key,
            result,
            self.agent.clone(),
            self.stores.conversations.clone(),
        )
    }
}
