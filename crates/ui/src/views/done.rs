use dioxus::prelude::*;

use crate::vm::ReportVm;

#[component]
pub fn DonePanel(report: ReportVm, export_note: Option<String>, on_export: EventHandler<()>) -> Element {
    let save_class = if report.saved {
        "save-status"
    } else {
        "save-status save-status--failed"
    };

    rsx! {
        section { class: "survey-done",
            h3 { class: "survey-done__title", "{report.title}" }
            dl { class: "survey-report",
                dt { "Starting score" }
                dd { "{report.start}" }

                dt { "Final rating" }
                dd { "{report.end}" }

                dt { "Average shift" }
                dd { "{report.avg_delta}" }

                dt { "Stories rated" }
                dd { "{report.rated}" }
            }
            p { class: "{save_class}", "{report.save_status}" }
            button {
                class: "btn btn-secondary",
                id: "survey-export",
                r#type: "button",
                onclick: move |_| on_export.call(()),
                "Export CSV"
            }
            if let Some(note) = export_note {
                p { class: "export-note", "{note}" }
            }
        }
    }
}
