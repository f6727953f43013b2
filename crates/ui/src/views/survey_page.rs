use dioxus::prelude::*;
use services::export::write_export;
use survey_core::model::{Rating, SessionPhase};

use super::done::DonePanel;
use super::exposure::ExposurePanel;
use super::init::InitPanel;
use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{SurveyIntent, SurveyVm, map_exposure_card, map_report};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn SurveyPage() -> Element {
    let ctx = use_context::<AppContext>();
    let survey_loop = ctx.survey_loop();
    let topic = ctx.topic().to_string();
    let export_dir = ctx.export_dir().to_path_buf();

    let vm = use_signal({
        let survey_loop = survey_loop.clone();
        move || Some(SurveyVm::new(survey_loop.start_session()))
    });
    // Last settled phase; stays readable while the session is out for a request.
    let shown_phase = use_signal(|| SessionPhase::Init);
    // Held here so a failed begin does not reset the participant's choice.
    let starting = use_signal(Rating::default);
    let error = use_signal(|| None::<ViewError>);
    let busy = use_signal(|| false);
    let mut export_note = use_signal(|| None::<String>);

    let dispatch_intent = {
        let survey_loop = survey_loop.clone();
        use_callback(move |intent: SurveyIntent| {
            let mut vm = vm;
            let mut shown_phase = shown_phase;
            let mut error = error;
            let mut busy = busy;
            if busy() {
                return;
            }
            busy.set(true);
            let survey_loop = survey_loop.clone();
            spawn(async move {
                let taken = vm.write().take();
                let Some(mut vm_value) = taken else {
                    error.set(Some(ViewError::Unknown));
                    busy.set(false);
                    return;
                };

                let result = match intent {
                    SurveyIntent::Begin(score) => vm_value.begin(&survey_loop, score).await,
                    SurveyIntent::Next(rating) => vm_value.next(&survey_loop, rating).await,
                };

                // Put the session back even on failure so the screen stays usable.
                shown_phase.set(vm_value.phase());
                vm.set(Some(vm_value));
                match result {
                    Ok(outcome) => {
                        tracing::debug!(?intent, ?outcome, "survey action applied");
                        error.set(None);
                    }
                    Err(err) => {
                        tracing::warn!(?intent, ?err, "survey action failed");
                        error.set(Some(err));
                    }
                }
                busy.set(false);
            });
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SurveyTestHandles>() {
                handles.register(dispatch_intent, starting);
            }
        }
    }

    let on_export = {
        let topic = topic.clone();
        use_callback(move |()| {
            let vm_guard = vm.read();
            let Some(report) = vm_guard.as_ref().and_then(SurveyVm::report) else {
                return;
            };
            match write_export(&export_dir, &topic, &report.rows) {
                Ok(path) => export_note.set(Some(format!("Saved to {}", path.display()))),
                Err(err) => {
                    tracing::warn!(error = %err, "export failed");
                    export_note.set(Some(ViewError::ExportFailed.message().to_string()));
                }
            }
        })
    };

    let vm_guard = vm.read();
    let phase = vm_guard
        .as_ref()
        .map_or_else(|| shown_phase(), SurveyVm::phase);
    let card = vm_guard
        .as_ref()
        .and_then(|vm| map_exposure_card(vm.session()));
    let report = vm_guard.as_ref().and_then(SurveyVm::report).map(map_report);
    drop(vm_guard);
    let busy_now = busy();
    let error_now = *error.read();
    let note = export_note();

    let body = match (phase, card, report) {
        (SessionPhase::Init, _, _) => rsx! {
            InitPanel {
                topic: topic.clone(),
                starting,
                busy: busy_now,
                on_intent: dispatch_intent,
            }
        },
        (SessionPhase::Survey, Some(card), _) => rsx! {
            ExposurePanel {
                key: "{card.index}",
                card,
                busy: busy_now,
                on_intent: dispatch_intent,
            }
        },
        (SessionPhase::Done, _, Some(report)) => rsx! {
            DonePanel { report, export_note: note, on_export }
        },
        _ => rsx! {
            p { "Loading..." }
        },
    };

    rsx! {
        div { class: "page survey-page",
            h2 { class: "survey-page__title", "Impression Tracker" }
            p { class: "survey-page__topic", "Topic: {topic}" }
            if let Some(err) = error_now {
                p { class: "survey-error", role: "alert", "{err.message()}" }
            }
            {body}
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SurveyTestHandles {
    dispatch: Rc<RefCell<Option<Callback<SurveyIntent>>>>,
    starting: Rc<RefCell<Option<Signal<Rating>>>>,
}

#[cfg(test)]
impl SurveyTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<SurveyIntent>, starting: Signal<Rating>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.starting.borrow_mut() = Some(starting);
    }

    pub(crate) fn dispatch(&self) -> Callback<SurveyIntent> {
        (*self.dispatch.borrow()).expect("survey dispatch registered")
    }

    pub(crate) fn starting(&self) -> Signal<Rating> {
        (*self.starting.borrow()).expect("starting score registered")
    }
}
