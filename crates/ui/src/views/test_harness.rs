use std::sync::Arc;
use std::time::Duration;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{ClientConfig, InMemoryStudyApi, StudyService};
use study_core::model::UserId;
use study_core::time::fixed_clock;
use tempfile::TempDir;

use crate::context::{UiApp, build_app_context};
use crate::controller::{Effect, ViewController, ViewEvent};
use crate::runtime::EffectRunner;
use crate::views::{StudyShell, use_driver};

struct TestApp {
    service: StudyService,
    config: ClientConfig,
}

impl UiApp for TestApp {
    fn study_service(&self) -> StudyService {
        self.service.clone()
    }

    fn config(&self) -> ClientConfig {
        self.config.clone()
    }
}

#[derive(Props, Clone)]
struct ShellRootProps {
    app: Arc<TestApp>,
    controller: ViewController,
}

impl PartialEq for ShellRootProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ShellRoot(props: ShellRootProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let ctx = use_context_provider(|| build_app_context(&app));
    let controller = props.controller.clone();
    use_driver(move || controller, || ctx.runner());
    rsx! { StudyShell {} }
}

/// Drives a controller headlessly against an in-memory backend, then
/// renders the shell for whatever state it reached.
pub struct ViewHarness {
    pub api: InMemoryStudyApi,
    pub controller: ViewController,
    runner: EffectRunner,
    app: Arc<TestApp>,
    _export_dir: TempDir,
}

impl ViewHarness {
    pub fn new() -> Self {
        let export_dir = tempfile::tempdir().expect("tempdir");
        let api = InMemoryStudyApi::new(fixed_clock());
        let service = StudyService::new(Arc::new(api.clone()));
        let config = ClientConfig::default()
            .with_default_user(UserId::fallback())
            .with_export_dir(export_dir.path())
            .with_empty_history_delay(Duration::ZERO);
        let app = Arc::new(TestApp { service, config });
        let ctx = build_app_context(&(app.clone() as Arc<dyn UiApp>));

        Self {
            api,
            controller: ctx.controller(),
            runner: ctx.runner(),
            app,
            _export_dir: export_dir,
        }
    }

    pub async fn drive(&mut self, event: ViewEvent) -> Vec<Effect> {
        self.runner.drive(&mut self.controller, event).await
    }

    pub fn render(&self) -> String {
        let mut dom = VirtualDom::new_with_props(
            ShellRoot,
            ShellRootProps {
                app: Arc::clone(&self.app),
                controller: self.controller.clone(),
            },
        );
        dom.rebuild_in_place();
        drive_dom(&mut dom);
        dioxus_ssr::render(&dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}
