use crate::components::use_i18n;
use crate::features::stats::StatsState;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct StatsBarProps {
    pub stats: StatsState,
}

#[function_component(StatsBar)]
pub(crate) fn stats_bar(props: &StatsBarProps) -> Html {
    let i18n = use_i18n();
    let tiles = props.stats.tiles(&i18n);
    if tiles.is_empty() {
        return html! {};
    }
    html! {
        <dl class={classes!("stats-bar", props.stats.loading.then_some("loading"))}>
            {for tiles.into_iter().map(|(label, value)| html! {
                <div class="stat">
                    <dt>{label}</dt>
                    <dd>{value}</dd>
                </div>
            })}
        </dl>
    }
}
