//! Video card.

use crate::components::use_i18n;
use crate::features::videos::item::{VideoItem, WatchControl};
use chrono::{DateTime, Utc};
use subdeck_api_models::VideoId;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct VideoCardProps {
    pub item: VideoItem,
    pub now_ms: u64,
    pub focused: bool,
    pub on_watch: Callback<VideoId>,
    pub on_open: Callback<VideoId>,
}

#[function_component(VideoCard)]
pub(crate) fn video_card(props: &VideoCardProps) -> Html {
    let i18n = use_i18n();
    let item = &props.item;
    let id = item.video.id;
    let now = i64::try_from(props.now_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or_default();

    let on_open = {
        let emit = props.on_open.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            emit.emit(id);
        })
    };
    let on_watch = {
        let emit = props.on_watch.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            emit.emit(id);
        })
    };
    let watch = match item.control {
        WatchControl::Watched => html! {
            <span class="badge watched">{i18n.text("videos.watched")}</span>
        },
        control => html! {
            <button
                type="button"
                class="btn watch"
                disabled={control == WatchControl::Pending}
                onclick={on_watch}
            >
                {i18n.text("videos.mark_watched")}
            </button>
        },
    };
    let duration = if item.video.duration == 0 {
        i18n.text("videos.live")
    } else {
        item.duration_label()
    };

    html! {
        <article
            id={format!("video-{id}")}
            class={classes!("video-card", props.focused.then_some("focused"), item.video.is_watched.then_some("watched"))}
            tabindex="-1"
        >
            <a class="thumbnail" href="#" onclick={on_open.clone()} title={i18n.text("videos.open")}>
                <img src={item.thumbnail()} alt={item.video.title.clone()} loading="lazy" />
                <span class="duration">{duration}</span>
            </a>
            <div class="details">
                <a class="title" href="#" onclick={on_open}>{item.video.title.clone()}</a>
                <div class="meta">
                    <span class="uploader">{item.video.channel_name.clone()}</span>
                    <span class="views">{item.views_label(&i18n)}</span>
                    if let Some(published) = item.published_label(&i18n, now) {
                        <span class="published">{published}</span>
                    }
                </div>
                {watch}
            </div>
        </article>
    }
}
