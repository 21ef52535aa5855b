//! Column board and channel column components.

use crate::app::{DashboardHandle, open_video};
use crate::components::use_i18n;
use crate::core::shortcuts::Focus;
use crate::features::columns::board::{ColumnBoard, ColumnOrder};
use crate::features::columns::controller::ChannelColumn;
use crate::features::columns::logic::SortSpec;
use crate::features::columns::state::{ColumnState, EmptyState, LoadPhase};
use crate::features::reorder::geometry::{Point, Rect, ReorderLayout, Slot};
use crate::features::reorder::session::{ReorderInput, ReorderKey, ReorderState};
use crate::features::videos::view::VideoCard;
use gloo::console;
use std::rc::Rc;
use subdeck_api_models::{ChannelId, VideoId};
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, Element, HtmlInputElement, HtmlSelectElement, Touch, TouchEvent};
use yew::prelude::*;
use yewdux::prelude::{use_selector, use_store_value};

/// Column handle compared by identity.
#[derive(Clone)]
pub(crate) struct ColumnHandle(pub(crate) Rc<ChannelColumn>);

impl PartialEq for ColumnHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

fn rect_of(element: &Element) -> Rect {
    let bounds = element.get_bounding_client_rect();
    Rect::new(bounds.left(), bounds.top(), bounds.width(), bounds.height())
}

/// Snapshot column bounds in display order.
fn measure(container: &NodeRef, board: &ColumnBoard) -> ReorderLayout {
    let Some(root) = container.cast::<Element>() else {
        return ReorderLayout::default();
    };
    let slots = board
        .columns()
        .iter()
        .filter_map(|column| {
            let selector = format!("[data-channel-id=\"{}\"]", column.id());
            let element = root.query_selector(&selector).ok().flatten()?;
            Some(Slot {
                channel: column.id(),
                name: column.channel().name,
                rect: rect_of(&element),
            })
        })
        .collect();
    ReorderLayout {
        slots,
        container: rect_of(&root),
    }
}

fn touch_point(touch: Option<Touch>) -> Option<Point> {
    touch.map(|touch| Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())))
}

fn drag_point(event: &DragEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

#[derive(Properties, PartialEq)]
pub(crate) struct ColumnBoardProps {
    pub focus: Focus,
}

#[function_component(ColumnBoardView)]
pub(crate) fn column_board_view(props: &ColumnBoardProps) -> Html {
    let i18n = use_i18n();
    let handle = use_context::<DashboardHandle>();
    let order = use_selector(|order: &ColumnOrder| order.ids.clone());
    let visuals = use_selector(|session: &ReorderState| session.visuals());
    let container = use_node_ref();
    let Some(DashboardHandle(dashboard)) = handle else {
        return html! {};
    };
    let board = dashboard.board();

    let dispatch = {
        let dashboard = dashboard.clone();
        let container = container.clone();
        Callback::from(move |input: ReorderInput| {
            let layout = measure(&container, &dashboard.board());
            dashboard.reorder().handle(&input, &layout);
        })
    };
    let on_drag_over = {
        let dispatch = dispatch.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            if let Some(transfer) = event.data_transfer() {
                transfer.set_drop_effect("move");
            }
            dispatch.emit(ReorderInput::DragOver {
                point: drag_point(&event),
            });
        })
    };
    let on_drag_leave = {
        let dispatch = dispatch.clone();
        let container = container.clone();
        Callback::from(move |event: DragEvent| {
            let inside = container
                .cast::<Element>()
                .is_some_and(|root| rect_of(&root).contains(drag_point(&event)));
            if !inside {
                dispatch.emit(ReorderInput::DragLeave);
            }
        })
    };
    let on_drop = {
        let dispatch = dispatch.clone();
        Callback::from(move |event: DragEvent| {
            event.prevent_default();
            dispatch.emit(ReorderInput::Drop {
                point: drag_point(&event),
            });
        })
    };

    if order.is_empty() {
        return html! {
            <div class="column-board empty">{i18n.text("channels.no_channels")}</div>
        };
    }

    let indicator = visuals.indicator_x.map(|x| {
        let offset = container
            .cast::<Element>()
            .map_or(0.0, |root| rect_of(&root).left);
        html! { <div class="drop-indicator" style={format!("left: {}px", x - offset)} /> }
    });

    html! {
        <div
            class="column-board"
            ref={container}
            ondragover={on_drag_over}
            ondragleave={on_drag_leave}
            ondrop={on_drop}
        >
            {for board.columns().into_iter().enumerate().map(|(index, column)| {
                let id = column.id();
                let focused_video = (props.focus.column == index).then_some(props.focus.video).flatten();
                html! {
                    <ChannelColumnView
                        key={id.0}
                        column={ColumnHandle(column)}
                        dragging={visuals.dragging == Some(id)}
                        drop_target={visuals.highlight == Some(id)}
                        keyboard={visuals.keyboard == Some(id)}
                        pressed={visuals.pressed == Some(id)}
                        focused_video={focused_video}
                        on_reorder={dispatch.clone()}
                    />
                }
            })}
            {for indicator}
        </div>
    }
}

#[derive(Clone, Properties, PartialEq)]
pub(crate) struct ChannelColumnProps {
    pub column: ColumnHandle,
    pub dragging: bool,
    pub drop_target: bool,
    pub keyboard: bool,
    pub pressed: bool,
    pub focused_video: Option<usize>,
    pub on_reorder: Callback<ReorderInput>,
}

/// Scopes the column's own store context around its body.
#[function_component(ChannelColumnView)]
pub(crate) fn channel_column_view(props: &ChannelColumnProps) -> Html {
    let column_store = props.column.0.context();
    html! {
        <ContextProvider<yewdux::Context> context={column_store}>
            <ChannelColumnBody ..props.clone() />
        </ContextProvider<yewdux::Context>>
    }
}

#[function_component(ChannelColumnBody)]
fn channel_column_body(props: &ChannelColumnProps) -> Html {
    let i18n = use_i18n();
    let handle = use_context::<DashboardHandle>();
    let column = props.column.0.clone();
    let state = use_store_value::<ColumnState>();
    let view = state.view();
    let channel = state.channel.clone();
    let channel_id: ChannelId = channel.id;
    let now_ms = handle
        .as_ref()
        .map_or(0, |handle| handle.0.ctx().scheduler.now_ms());

    let emit = |input: ReorderInput| {
        let on_reorder = props.on_reorder.clone();
        move || on_reorder.emit(input.clone())
    };
    let on_drag_start = {
        let start = emit(ReorderInput::DragStart {
            channel: channel_id,
        });
        Callback::from(move |event: DragEvent| {
            if let Some(transfer) = event.data_transfer() {
                transfer.set_effect_allowed("move");
                if let Err(err) = transfer.set_data("text/plain", &channel_id.to_string()) {
                    console::warn!(format!("drag payload rejected: {err:?}"));
                }
            }
            start();
        })
    };
    let on_drag_end = {
        let end = emit(ReorderInput::DragEnd);
        Callback::from(move |_: DragEvent| end())
    };
    let on_touch_start = {
        let on_reorder = props.on_reorder.clone();
        Callback::from(move |event: TouchEvent| {
            if let Some(point) = touch_point(event.touches().get(0)) {
                on_reorder.emit(ReorderInput::TouchStart {
                    channel: channel_id,
                    point,
                });
            }
        })
    };
    let on_touch_move = {
        let on_reorder = props.on_reorder.clone();
        Callback::from(move |event: TouchEvent| {
            if let Some(point) = touch_point(event.touches().get(0)) {
                event.prevent_default();
                on_reorder.emit(ReorderInput::TouchMove { point });
            }
        })
    };
    let on_touch_end = {
        let on_reorder = props.on_reorder.clone();
        Callback::from(move |event: TouchEvent| {
            match touch_point(event.changed_touches().get(0)) {
                Some(point) => on_reorder.emit(ReorderInput::TouchEnd { point }),
                None => on_reorder.emit(ReorderInput::TouchCancel),
            }
        })
    };
    let on_touch_cancel = {
        let cancel = emit(ReorderInput::TouchCancel);
        Callback::from(move |_: TouchEvent| cancel())
    };
    let on_handle_key = {
        let on_reorder = props.on_reorder.clone();
        Callback::from(move |event: KeyboardEvent| {
            if let Some(key) = ReorderKey::from_key(&event.key()) {
                event.prevent_default();
                event.stop_propagation();
                on_reorder.emit(ReorderInput::Key {
                    channel: channel_id,
                    key,
                });
            }
        })
    };
    let on_search = {
        let column = column.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            column.set_search_term(&input.value());
        })
    };
    let on_sort = {
        let column = column.clone();
        Callback::from(move |event: Event| {
            let select: HtmlSelectElement = event.target_unchecked_into();
            column.set_sort_value(&select.value());
        })
    };
    let on_clear = {
        let column = column.clone();
        Callback::from(move |_: MouseEvent| {
            let column = column.clone();
            spawn_local(async move {
                column.clear_watched().await;
            });
        })
    };
    let on_retry = {
        let column = column.clone();
        Callback::from(move |_: MouseEvent| {
            let column = column.clone();
            spawn_local(async move {
                column.refresh().await;
            });
        })
    };
    let on_watch = {
        let column = column.clone();
        Callback::from(move |video: VideoId| {
            let column = column.clone();
            spawn_local(async move {
                column.mark_watched(video).await;
            });
        })
    };
    let on_open = {
        let handle = handle.clone();
        Callback::from(move |video: VideoId| {
            if let Some(handle) = &handle {
                open_video(&handle.0, video);
            }
        })
    };

    let accent = channel
        .color
        .clone()
        .map(|color| format!("--channel-color: {color}"));
    let body = if view.phase == LoadPhase::Loading && view.items.is_empty() {
        html! { <div class="column-status">{i18n.text("common.loading")}</div> }
    } else if view.phase == LoadPhase::Failed && view.items.is_empty() {
        html! {
            <div class="column-status error">
                <span>{i18n.text("videos.load_failed")}</span>
                <button type="button" class="btn" onclick={on_retry.clone()}>{i18n.text("common.retry")}</button>
            </div>
        }
    } else if let Some(empty) = view.empty {
        let key = match empty {
            EmptyState::NoVideos => "videos.no_videos",
            EmptyState::NoMatches => "videos.no_matches",
        };
        html! { <div class="column-status">{i18n.text(key)}</div> }
    } else {
        html! {
            <div class="video-list">
                {for view.items.iter().enumerate().map(|(index, item)| html! {
                    <VideoCard
                        key={item.video.id.0}
                        item={item.clone()}
                        now_ms={now_ms}
                        focused={props.focused_video == Some(index)}
                        on_watch={on_watch.clone()}
                        on_open={on_open.clone()}
                    />
                })}
            </div>
        }
    };

    html! {
        <section
            class={classes!(
                "channel-column",
                props.dragging.then_some("dragging"),
                props.drop_target.then_some("drop-target"),
                props.keyboard.then_some("reordering"),
            )}
            data-channel-id={channel_id.to_string()}
            style={accent}
        >
            <header class="column-header">
                <button
                    type="button"
                    class={classes!("drag-handle", props.pressed.then_some("touch-active"))}
                    draggable="true"
                    aria-label={i18n.t("channels.drag_handle", &[("name", channel.name.clone())])}
                    aria-pressed={props.keyboard.to_string()}
                    ondragstart={on_drag_start}
                    ondragend={on_drag_end}
                    ontouchstart={on_touch_start}
                    ontouchmove={on_touch_move}
                    ontouchend={on_touch_end}
                    ontouchcancel={on_touch_cancel}
                    onkeydown={on_handle_key}
                >
                    {"⋮⋮"}
                </button>
                <h2 class="channel-name">{channel.name.clone()}</h2>
                <span class="unwatched-count">{view.header_label(&i18n)}</span>
                <button type="button" class="btn ghost" onclick={on_retry}>{i18n.text("common.refresh")}</button>
            </header>
            <div class="column-tools">
                <input
                    type="search"
                    value={state.search_input.clone()}
                    placeholder={i18n.text("videos.search_placeholder")}
                    oninput={on_search}
                />
                <select onchange={on_sort}>
                    {for SortSpec::OPTIONS.into_iter().map(|spec| html! {
                        <option value={spec.value()} selected={spec == state.sort}>
                            {i18n.text(spec.label_key())}
                        </option>
                    })}
                </select>
                <button
                    type="button"
                    class="btn clear"
                    disabled={!view.can_clear()}
                    onclick={on_clear}
                >
                    {i18n.t("videos.clear_watched", &[("count", view.clear_count.to_string())])}
                </button>
            </div>
            {body}
        </section>
    }
}
