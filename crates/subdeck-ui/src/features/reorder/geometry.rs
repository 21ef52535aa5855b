//! Layout snapshots and insertion-index math.

use subdeck_api_models::ChannelId;

/// Viewport point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Build a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Build a rect.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Horizontal center.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Whether `point` lies inside, edges included.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.top + self.height
    }
}

/// One rendered column.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    /// Channel shown in the column.
    pub channel: ChannelId,
    /// Channel name for announcements.
    pub name: String,
    /// Column bounds.
    pub rect: Rect,
}

/// Columns in display order plus the container bounds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReorderLayout {
    /// Rendered columns, left to right.
    pub slots: Vec<Slot>,
    /// Bounds of the column container.
    pub container: Rect,
}

impl ReorderLayout {
    /// Display index of `channel`.
    #[must_use]
    pub fn index_of(&self, channel: ChannelId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.channel == channel)
    }

    /// Name of `channel`, empty when unknown.
    #[must_use]
    pub fn name_of(&self, channel: ChannelId) -> String {
        self.slots
            .iter()
            .find(|slot| slot.channel == channel)
            .map(|slot| slot.name.clone())
            .unwrap_or_default()
    }

    /// Number of columns left of `x` by their horizontal center.
    ///
    /// Left of a column's center inserts before it, right of center after it.
    #[must_use]
    pub fn insertion_index(&self, x: f64) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.rect.center_x() < x)
            .count()
    }

    /// Drop indicator position for an insertion index.
    #[must_use]
    pub fn indicator_x(&self, insertion: usize) -> Option<f64> {
        self.slots
            .get(insertion)
            .map(|slot| slot.rect.left)
            .or_else(|| self.slots.last().map(|slot| slot.rect.right()))
    }

    /// Column under `point`.
    #[must_use]
    pub fn column_at(&self, point: Point) -> Option<ChannelId> {
        self.slots
            .iter()
            .find(|slot| slot.rect.contains(point))
            .map(|slot| slot.channel)
    }
}

/// Final display index when the column at `from` is inserted before slot `insertion`.
#[must_use]
pub const fn final_index(from: usize, insertion: usize) -> usize {
    if insertion > from {
        insertion - 1
    } else {
        insertion
    }
}

#[cfg(test)]
pub(crate) fn row_layout(names: &[(i64, &str)]) -> ReorderLayout {
    let mut left = 0.0;
    let slots = names
        .iter()
        .map(|(id, name)| {
            let slot = Slot {
                channel: ChannelId(*id),
                name: (*name).to_string(),
                rect: Rect::new(left, 0.0, 100.0, 500.0),
            };
            left += 110.0;
            slot
        })
        .collect::<Vec<_>>();
    ReorderLayout {
        slots,
        container: Rect::new(0.0, 0.0, left, 500.0),
    }
}
