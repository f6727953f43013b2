use dioxus::prelude::*;
use survey_core::model::Rating;

/// 0–100 slider bound to a rating signal.
#[component]
pub fn RatingSlider(id: &'static str, label: &'static str, value: Signal<Rating>) -> Element {
    let mut value = value;
    let current = value();
    let raw = current.value();
    let min = Rating::MIN;
    let max = Rating::MAX;
    let step = Rating::STEP;

    rsx! {
        div { class: "rating-slider",
            label { r#for: id, "{label}" }
            input {
                id,
                r#type: "range",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{raw}",
                oninput: move |evt: FormEvent| {
                    if let Ok(parsed) = evt.value().parse::<f64>() {
                        value.set(Rating::clamped(parsed));
                    }
                },
            }
            span { class: "rating-slider__value", "{current}" }
        }
    }
}
