use std::sync::Arc;

use services::{ClientConfig, StudyService};

use crate::controller::ViewController;
use crate::runtime::EffectRunner;

pub trait UiApp: Send + Sync {
    fn study_service(&self) -> StudyService;
    fn config(&self) -> ClientConfig;
}

#[derive(Clone, Debug)]
pub struct AppContext {
    service: StudyService,
    config: ClientConfig,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            service: app.study_service(),
            config: app.config(),
        }
    }

    #[must_use]
    pub fn service(&self) -> StudyService {
        self.service.clone()
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn runner(&self) -> EffectRunner {
        EffectRunner::new(self.service(), self.config.export_dir.clone())
    }

    /// A controller in its initial state, seeded from the configuration.
    #[must_use]
    pub fn controller(&self) -> ViewController {
        ViewController::new(
            self.config.default_user.clone(),
            self.config.empty_history_delay,
        )
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
