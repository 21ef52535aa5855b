//! Visually hidden live region for reorder announcements.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct LiveRegionProps {
    pub text: Option<String>,
}

#[function_component(LiveRegion)]
pub(crate) fn live_region(props: &LiveRegionProps) -> Html {
    html! {
        <div class="sr-only" role="status" aria-live="assertive" aria-atomic="true">
            {props.text.clone().unwrap_or_default()}
        </div>
    }
}
