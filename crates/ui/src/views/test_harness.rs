use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{
    Clock, ExposureProvider, ExposureSampler, FetchError, SurveyLoopService, SurveySettings,
};
use storage::InMemoryResponseStore;
use survey_core::model::{Exposure, Rating};
use survey_core::time::fixed_now;

use super::survey_page::{SurveyPage, SurveyTestHandles};
use crate::context::{UiApp, build_app_context};
use crate::vm::SurveyIntent;

pub const TEST_TOPIC: &str = "Pete Buttigieg";

/// Serves `items` stories after failing the first `failures` fetches.
pub struct StubProvider {
    items: usize,
    failures: AtomicUsize,
}

#[async_trait]
impl ExposureProvider for StubProvider {
    async fn fetch(&self, _topic: &str, max_count: usize) -> Result<Vec<Exposure>, FetchError> {
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(FetchError::Api("unavailable".into()));
        }
        Ok((0..self.items.min(max_count))
            .map(|i| Exposure::new(format!("Headline {i}"), format!("Summary {i}")).unwrap())
            .collect())
    }
}

struct TestApp {
    survey_loop: Arc<SurveyLoopService>,
    export_dir: PathBuf,
}

impl UiApp for TestApp {
    fn survey_loop(&self) -> Arc<SurveyLoopService> {
        Arc::clone(&self.survey_loop)
    }

    fn export_dir(&self) -> PathBuf {
        self.export_dir.clone()
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    app: Arc<TestApp>,
    handles: SurveyTestHandles,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn SurveyHarnessRoot(props: HarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { SurveyPage {} }
}

pub struct SurveyHarness {
    pub dom: VirtualDom,
    pub store: InMemoryResponseStore,
    pub export_dir: tempfile::TempDir,
    handles: SurveyTestHandles,
}

impl SurveyHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn dispatch(&self, intent: SurveyIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
    }

    /// Moves the starting slider as the participant would.
    pub fn set_starting(&mut self, rating: Rating) {
        let mut starting = self.handles.starting();
        self.dom.in_runtime(|| starting.set(rating));
        drive_dom(&mut self.dom);
    }

    /// Presses Begin with whatever the starting slider currently holds.
    pub fn press_begin(&self) {
        let starting = self.handles.starting();
        let rating = self.dom.in_runtime(|| *starting.peek());
        self.dispatch(SurveyIntent::Begin(rating));
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..3 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_survey_harness(items: usize, failures: usize) -> SurveyHarness {
    let store = InMemoryResponseStore::new();
    let export_dir = tempfile::tempdir().unwrap();
    let survey_loop = SurveyLoopService::new(
        Clock::fixed(fixed_now()),
        SurveySettings {
            topic: TEST_TOPIC.into(),
            target_sample_size: 10,
            fetch_count: 10,
        },
        Arc::new(StubProvider {
            items,
            failures: AtomicUsize::new(failures),
        }),
        Arc::new(store.clone()),
    )
    .with_sampler(ExposureSampler::seeded(1));

    let app = Arc::new(TestApp {
        survey_loop: Arc::new(survey_loop),
        export_dir: export_dir.path().to_path_buf(),
    });
    let handles = SurveyTestHandles::default();
    let dom = VirtualDom::new_with_props(
        SurveyHarnessRoot,
        HarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    SurveyHarness {
        dom,
        store,
        export_dir,
        handles,
    }
}
