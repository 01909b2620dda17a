//! Push channel status dot

use dioxus::prelude::*;

use crate::infrastructure::messaging::ConnectionState;

#[component]
pub fn ConnectionIndicator(state: ConnectionState) -> Element {
    rsx! {
        div {
            class: "connection-indicator",
            title: "Live rooms channel",
            span { class: "dot {state.indicator_class()}" }
            span { class: "connection-text", "{state.display_text()}" }
        }
    }
}
