//! Reorder session state machine.

use crate::features::reorder::geometry::{Point, ReorderLayout, final_index};
use subdeck_api_models::ChannelId;
use tracing::debug;
use yewdux::store::Store;

/// Input device driving a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragSource {
    /// HTML5 drag and drop.
    Pointer,
    /// Touch events on the handle.
    Touch,
}

/// Keys understood by the handle while focused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReorderKey {
    /// Enter: enter reorder mode, or confirm when already in it.
    Enter,
    /// Space: enter reorder mode.
    Space,
    /// Move one position left.
    Left,
    /// Move one position right.
    Right,
    /// Leave reorder mode.
    Escape,
}

impl ReorderKey {
    /// Map a `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Self::Enter),
            " " | "Spacebar" => Some(Self::Space),
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            "Escape" | "Esc" => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Reorder session state.
#[derive(Clone, Debug, Default, PartialEq, Store)]
pub enum ReorderState {
    /// No session.
    #[default]
    Idle,
    /// Finger down on a handle, below the drag threshold.
    Pressed {
        /// Handle owner.
        channel: ChannelId,
        /// Touch-start position.
        origin: Point,
    },
    /// A column is being dragged.
    Dragging {
        /// Dragged column.
        channel: ChannelId,
        /// Device driving the drag.
        source: DragSource,
        /// Candidate insertion index, once the pointer is over the board.
        insertion: Option<usize>,
        /// Drop indicator position.
        indicator_x: Option<f64>,
        /// Column currently under the pointer.
        over: Option<ChannelId>,
    },
    /// Keyboard reorder mode.
    Keyboard {
        /// Column being moved.
        channel: ChannelId,
    },
}

/// Raw interaction fed to [`step`].
#[derive(Clone, Debug, PartialEq)]
pub enum ReorderInput {
    /// `dragstart` on a handle.
    DragStart {
        /// Handle owner.
        channel: ChannelId,
    },
    /// `dragover` on the container.
    DragOver {
        /// Pointer position.
        point: Point,
    },
    /// `dragleave` out of the container.
    DragLeave,
    /// `drop` on the container.
    Drop {
        /// Pointer position.
        point: Point,
    },
    /// `dragend` on the source.
    DragEnd,
    /// `touchstart` on a handle.
    TouchStart {
        /// Handle owner.
        channel: ChannelId,
        /// Touch position.
        point: Point,
    },
    /// `touchmove` after a touch start.
    TouchMove {
        /// Touch position.
        point: Point,
    },
    /// `touchend` after a touch start.
    TouchEnd {
        /// Last touch position.
        point: Point,
    },
    /// `touchcancel`.
    TouchCancel,
    /// Key press on a focused handle.
    Key {
        /// Handle owner.
        channel: ChannelId,
        /// Key pressed.
        key: ReorderKey,
    },
}

/// Assistive announcement payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Announcement {
    /// Keyboard mode entered.
    Entered {
        /// Column name.
        name: String,
    },
    /// Column moved by keyboard.
    Moved {
        /// Column name.
        name: String,
        /// One-based position.
        position: usize,
        /// Column count.
        total: usize,
    },
    /// Keyboard order confirmed.
    Confirmed {
        /// Column name.
        name: String,
        /// One-based position.
        position: usize,
    },
    /// Keyboard mode left without saving.
    Exited {
        /// Column name.
        name: String,
    },
}

/// Side effect requested by a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReorderEffect {
    /// Move `channel` to display index `to`.
    Move {
        /// Column to move.
        channel: ChannelId,
        /// Target display index.
        to: usize,
    },
    /// Persist the current display order.
    Persist,
    /// Publish an announcement.
    Announce(Announcement),
}

/// Transient visuals derived from the state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReorderVisuals {
    /// Column rendered as being dragged.
    pub dragging: Option<ChannelId>,
    /// Drop indicator position.
    pub indicator_x: Option<f64>,
    /// Column highlighted as the drop target.
    pub highlight: Option<ChannelId>,
    /// Column in keyboard reorder mode.
    pub keyboard: Option<ChannelId>,
    /// Handle showing touch feedback.
    pub pressed: Option<ChannelId>,
}

impl ReorderState {
    /// Visuals for this state; everything is cleared when idle.
    #[must_use]
    pub fn visuals(&self) -> ReorderVisuals {
        match self {
            Self::Idle => ReorderVisuals::default(),
            Self::Pressed { channel, .. } => ReorderVisuals {
                pressed: Some(*channel),
                ..ReorderVisuals::default()
            },
            Self::Dragging {
                channel,
                indicator_x,
                over,
                source,
                ..
            } => ReorderVisuals {
                dragging: Some(*channel),
                indicator_x: *indicator_x,
                highlight: over.filter(|target| target != channel),
                pressed: (*source == DragSource::Touch).then_some(*channel),
                keyboard: None,
            },
            Self::Keyboard { channel } => ReorderVisuals {
                keyboard: Some(*channel),
                ..ReorderVisuals::default()
            },
        }
    }

    /// Whether no session is active.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Advance the session.
///
/// `threshold` is the touch distance, per axis, that turns a press into a drag.
#[must_use]
pub fn step(
    state: &ReorderState,
    input: &ReorderInput,
    layout: &ReorderLayout,
    threshold: f64,
) -> (ReorderState, Vec<ReorderEffect>) {
    let next = match (state, input) {
        (ReorderState::Idle, ReorderInput::DragStart { channel })
            if layout.index_of(*channel).is_some() =>
        {
            (dragging(*channel, DragSource::Pointer), Vec::new())
        }
        (
            ReorderState::Dragging {
                channel,
                source: DragSource::Pointer,
                ..
            },
            ReorderInput::DragOver { point },
        ) => (track(*channel, DragSource::Pointer, *point, layout), Vec::new()),
        (
            ReorderState::Dragging {
                channel, source, ..
            },
            ReorderInput::DragLeave,
        ) => (dragging(*channel, *source), Vec::new()),
        (
            ReorderState::Dragging {
                channel,
                source: DragSource::Pointer,
                ..
            },
            ReorderInput::Drop { point },
        ) => (ReorderState::Idle, drop_at(*channel, point.x, layout)),
        (ReorderState::Dragging { .. }, ReorderInput::DragEnd | ReorderInput::TouchCancel)
        | (ReorderState::Pressed { .. }, ReorderInput::TouchEnd { .. } | ReorderInput::TouchCancel) => {
            (ReorderState::Idle, Vec::new())
        }
        (ReorderState::Idle, ReorderInput::TouchStart { channel, point })
            if layout.index_of(*channel).is_some() =>
        {
            (
                ReorderState::Pressed {
                    channel: *channel,
                    origin: *point,
                },
                Vec::new(),
            )
        }
        (ReorderState::Pressed { channel, origin }, ReorderInput::TouchMove { point }) => {
            let moved = (point.x - origin.x).abs() > threshold
                || (point.y - origin.y).abs() > threshold;
            if moved {
                (track(*channel, DragSource::Touch, *point, layout), Vec::new())
            } else {
                (state.clone(), Vec::new())
            }
        }
        (
            ReorderState::Dragging {
                channel,
                source: DragSource::Touch,
                ..
            },
            ReorderInput::TouchMove { point },
        ) => (track(*channel, DragSource::Touch, *point, layout), Vec::new()),
        (
            ReorderState::Dragging {
                channel,
                source: DragSource::Touch,
                ..
            },
            ReorderInput::TouchEnd { point },
        ) => {
            if layout.container.contains(*point) {
                (ReorderState::Idle, drop_at(*channel, point.x, layout))
            } else {
                (ReorderState::Idle, Vec::new())
            }
        }
        (ReorderState::Idle, ReorderInput::Key { channel, key })
            if matches!(key, ReorderKey::Enter | ReorderKey::Space)
                && layout.index_of(*channel).is_some() =>
        {
            (
                ReorderState::Keyboard { channel: *channel },
                vec![ReorderEffect::Announce(Announcement::Entered {
                    name: layout.name_of(*channel),
                })],
            )
        }
        (ReorderState::Keyboard { channel }, ReorderInput::Key { channel: target, key })
            if target == channel =>
        {
            keyboard(*channel, *key, layout)
        }
        _ => (state.clone(), Vec::new()),
    };
    if &next.0 != state {
        debug!(from = ?state, to = ?next.0, "reorder transition");
    }
    next
}

const fn dragging(channel: ChannelId, source: DragSource) -> ReorderState {
    ReorderState::Dragging {
        channel,
        source,
        insertion: None,
        indicator_x: None,
        over: None,
    }
}

fn track(channel: ChannelId, source: DragSource, point: Point, layout: &ReorderLayout) -> ReorderState {
    let inside = source == DragSource::Pointer || layout.container.contains(point);
    if !inside {
        return dragging(channel, source);
    }
    let insertion = layout.insertion_index(point.x);
    ReorderState::Dragging {
        channel,
        source,
        insertion: Some(insertion),
        indicator_x: layout.indicator_x(insertion),
        over: layout.column_at(point),
    }
}

fn drop_at(channel: ChannelId, x: f64, layout: &ReorderLayout) -> Vec<ReorderEffect> {
    let Some(from) = layout.index_of(channel) else {
        return Vec::new();
    };
    let to = final_index(from, layout.insertion_index(x));
    if to == from {
        return Vec::new();
    }
    vec![ReorderEffect::Move { channel, to }, ReorderEffect::Persist]
}

fn keyboard(
    channel: ChannelId,
    key: ReorderKey,
    layout: &ReorderLayout,
) -> (ReorderState, Vec<ReorderEffect>) {
    let stay = ReorderState::Keyboard { channel };
    let Some(index) = layout.index_of(channel) else {
        return (ReorderState::Idle, Vec::new());
    };
    let name = layout.name_of(channel);
    let total = layout.slots.len();
    match key {
        ReorderKey::Left | ReorderKey::Right => {
            let to = if key == ReorderKey::Left {
                index.saturating_sub(1)
            } else {
                (index + 1).min(total - 1)
            };
            if to == index {
                return (stay, Vec::new());
            }
            (
                stay,
                vec![
                    ReorderEffect::Move { channel, to },
                    ReorderEffect::Announce(Announcement::Moved {
                        name,
                        position: to + 1,
                        total,
                    }),
                ],
            )
        }
        ReorderKey::Enter => (
            ReorderState::Idle,
            vec![
                ReorderEffect::Persist,
                ReorderEffect::Announce(Announcement::Confirmed {
                    name,
                    position: index + 1,
                }),
            ],
        ),
        ReorderKey::Escape => (
            ReorderState::Idle,
            vec![ReorderEffect::Announce(Announcement::Exited { name })],
        ),
        ReorderKey::Space => (stay, Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reorder::geometry::{ReorderLayout, row_layout};

    const THRESHOLD: f64 = 10.0;

    fn layout() -> ReorderLayout {
        row_layout(&[(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")])
    }

    fn run(inputs: &[ReorderInput], layout: &ReorderLayout) -> (ReorderState, Vec<ReorderEffect>) {
        let mut state = ReorderState::Idle;
        let mut effects = Vec::new();
        for input in inputs {
            let (next, mut produced) = step(&state, input, layout, THRESHOLD);
            state = next;
            effects.append(&mut produced);
        }
        (state, effects)
    }

    #[test]
    fn pointer_drop_moves_and_persists() {
        let (state, effects) = run(
            &[
                ReorderInput::DragStart {
                    channel: ChannelId(1),
                },
                ReorderInput::DragOver {
                    point: Point::new(300.0, 10.0),
                },
                ReorderInput::Drop {
                    point: Point::new(300.0, 10.0),
                },
                ReorderInput::DragEnd,
            ],
            &layout(),
        );
        assert!(state.is_idle());
        assert_eq!(
            effects,
            vec![
                ReorderEffect::Move {
                    channel: ChannelId(1),
                    to: 2
                },
                ReorderEffect::Persist
            ]
        );
    }

    #[test]
    fn drag_over_tracks_indicator_and_highlight() {
        let layout = layout();
        let (state, _) = run(
            &[
                ReorderInput::DragStart {
                    channel: ChannelId(1),
                },
                ReorderInput::DragOver {
                    point: Point::new(120.0, 10.0),
                },
            ],
            &layout,
        );
        let visuals = state.visuals();
        assert_eq!(visuals.dragging, Some(ChannelId(1)));
        assert_eq!(visuals.indicator_x, Some(110.0));
        assert_eq!(visuals.highlight, Some(ChannelId(2)));
    }

    #[test]
    fn drag_end_without_drop_cancels_and_clears_visuals() {
        let (state, effects) = run(
            &[
                ReorderInput::DragStart {
                    channel: ChannelId(3),
                },
                ReorderInput::DragOver {
                    point: Point::new(5.0, 10.0),
                },
                ReorderInput::DragEnd,
            ],
            &layout(),
        );
        assert!(effects.is_empty());
        assert_eq!(state.visuals(), ReorderVisuals::default());
    }

    #[test]
    fn drop_on_own_slot_is_a_no_op() {
        let (_, effects) = run(
            &[
                ReorderInput::DragStart {
                    channel: ChannelId(2),
                },
                ReorderInput::Drop {
                    point: Point::new(170.0, 10.0),
                },
            ],
            &layout(),
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn touch_below_threshold_is_a_tap() {
        let (state, effects) = run(
            &[
                ReorderInput::TouchStart {
                    channel: ChannelId(1),
                    point: Point::new(50.0, 50.0),
                },
                ReorderInput::TouchMove {
                    point: Point::new(58.0, 59.0),
                },
                ReorderInput::TouchEnd {
                    point: Point::new(58.0, 59.0),
                },
            ],
            &layout(),
        );
        assert!(state.is_idle());
        assert!(effects.is_empty());
    }

    #[test]
    fn touch_drag_drops_inside_container() {
        let (_, effects) = run(
            &[
                ReorderInput::TouchStart {
                    channel: ChannelId(5),
                    point: Point::new(490.0, 50.0),
                },
                ReorderInput::TouchMove {
                    point: Point::new(20.0, 50.0),
                },
                ReorderInput::TouchEnd {
                    point: Point::new(20.0, 50.0),
                },
            ],
            &layout(),
        );
        assert_eq!(
            effects,
            vec![
                ReorderEffect::Move {
                    channel: ChannelId(5),
                    to: 0
                },
                ReorderEffect::Persist
            ]
        );
    }

    #[test]
    fn touch_release_outside_container_cancels() {
        let (state, effects) = run(
            &[
                ReorderInput::TouchStart {
                    channel: ChannelId(1),
                    point: Point::new(50.0, 50.0),
                },
                ReorderInput::TouchMove {
                    point: Point::new(300.0, 50.0),
                },
                ReorderInput::TouchEnd {
                    point: Point::new(300.0, 900.0),
                },
            ],
            &layout(),
        );
        assert!(state.is_idle());
        assert!(effects.is_empty());
    }

    #[test]
    fn keyboard_moves_clamp_and_confirm_persists() {
        let layout = row_layout(&[(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")]);
        let key = |key| ReorderInput::Key {
            channel: ChannelId(3),
            key,
        };
        let (state, effects) = run(&[key(ReorderKey::Enter), key(ReorderKey::Right)], &layout);
        assert_eq!(
            state,
            ReorderState::Keyboard {
                channel: ChannelId(3)
            }
        );
        assert_eq!(
            effects,
            vec![
                ReorderEffect::Announce(Announcement::Entered { name: "c".into() }),
                ReorderEffect::Move {
                    channel: ChannelId(3),
                    to: 3
                },
                ReorderEffect::Announce(Announcement::Moved {
                    name: "c".into(),
                    position: 4,
                    total: 5
                }),
            ]
        );

        let edge = row_layout(&[(1, "a"), (2, "b"), (4, "d"), (5, "e"), (3, "c")]);
        let (_, clamped) = step(&state, &key(ReorderKey::Right), &edge, THRESHOLD);
        assert!(clamped.is_empty());

        let (done, confirm) = step(&state, &key(ReorderKey::Enter), &edge, THRESHOLD);
        assert!(done.is_idle());
        assert_eq!(confirm[0], ReorderEffect::Persist);
    }

    #[test]
    fn escape_exits_without_persisting() {
        let key = |key| ReorderInput::Key {
            channel: ChannelId(2),
            key,
        };
        let (state, effects) = run(
            &[key(ReorderKey::Space), key(ReorderKey::Left), key(ReorderKey::Escape)],
            &layout(),
        );
        assert!(state.is_idle());
        assert!(!effects.contains(&ReorderEffect::Persist));
        assert_eq!(
            effects.last(),
            Some(&ReorderEffect::Announce(Announcement::Exited {
                name: "b".into()
            }))
        );
    }

    #[test]
    fn key_mapping() {
        assert_eq!(ReorderKey::from_key(" "), Some(ReorderKey::Space));
        assert_eq!(ReorderKey::from_key("ArrowLeft"), Some(ReorderKey::Left));
        assert_eq!(ReorderKey::from_key("a"), None);
    }
}
