use dioxus::prelude::*;
use survey_core::model::Rating;

use super::slider::RatingSlider;
use crate::vm::SurveyIntent;

#[component]
pub fn InitPanel(
    topic: String,
    starting: Signal<Rating>,
    busy: bool,
    on_intent: EventHandler<SurveyIntent>,
) -> Element {
    rsx! {
        section { class: "survey-init",
            p { "Before we start: how do you feel about {topic} right now?" }
            p { class: "survey-hint", "0 is strongly unfavorable, 100 is strongly favorable." }
            RatingSlider { id: "starting-rating", label: "Starting score", value: starting }
            button {
                class: "btn",
                id: "survey-begin",
                r#type: "button",
                disabled: busy,
                onclick: move |_| on_intent.call(SurveyIntent::Begin(starting())),
                if busy { "Loading stories..." } else { "Begin" }
            }
        }
    }
}
