use dioxus::prelude::*;

use super::slider::RatingSlider;
use crate::vm::{ExposureCardVm, SurveyIntent};

/// One exposure plus its rating control.
///
/// Render with `key` set to the exposure index so the slider restarts from
/// the carried-forward default on every story.
#[component]
pub fn ExposurePanel(
    card: ExposureCardVm,
    busy: bool,
    on_intent: EventHandler<SurveyIntent>,
) -> Element {
    let default_rating = card.default_rating;
    let rating = use_signal(move || default_rating);

    rsx! {
        article { class: "exposure-card",
            p { class: "exposure-card__progress", "{card.progress_label}" }
            h3 { class: "exposure-card__headline", "{card.headline}" }
            p { class: "exposure-card__summary", "{card.summary}" }
            p { "After reading this, where do you stand now?" }
            RatingSlider { id: "exposure-rating", label: "Your rating", value: rating }
            button {
                class: "btn",
                id: "survey-next",
                r#type: "button",
                disabled: busy,
                onclick: move |_| on_intent.call(SurveyIntent::Next(rating())),
                "Next"
            }
        }
    }
}
