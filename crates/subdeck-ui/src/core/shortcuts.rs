//! Global keyboard shortcuts and focus navigation.
//!
//! # Design
//! - Map raw key names to semantic actions; the shell performs them.
//! - Focus movement is computed over counts only, so it is testable without a DOM.

/// Semantic action for a global key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    /// Reload channels, stats and columns.
    Refresh,
    /// Move focus to the locale selector.
    FocusLocale,
    /// Show the shortcut help overlay.
    ShowHelp,
    /// Close overlays and dialogs.
    CloseOverlays,
    /// Mark the focused video watched.
    WatchFocused,
    /// Open the focused video.
    OpenFocused,
    /// Focus the previous video in the column.
    PrevVideo,
    /// Focus the next video in the column.
    NextVideo,
    /// Focus the previous column.
    PrevColumn,
    /// Focus the next column.
    NextColumn,
}

/// Modifier state accompanying a key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Control or Command held.
    pub command: bool,
    /// Shift held.
    pub shift: bool,
    /// Focus is inside an editable control.
    pub typing: bool,
}

/// Map a key press to a shortcut.
#[must_use]
pub fn interpret_shortcut(key: &str, modifiers: Modifiers) -> Option<Shortcut> {
    if modifiers.typing {
        return None;
    }
    match key {
        "r" | "R" if modifiers.command => Some(Shortcut::Refresh),
        "l" | "L" if modifiers.command => Some(Shortcut::FocusLocale),
        "?" if modifiers.shift => Some(Shortcut::ShowHelp),
        "Escape" => Some(Shortcut::CloseOverlays),
        " " | "w" | "W" if !modifiers.command => Some(Shortcut::WatchFocused),
        "Enter" => Some(Shortcut::OpenFocused),
        "ArrowUp" => Some(Shortcut::PrevVideo),
        "ArrowDown" => Some(Shortcut::NextVideo),
        "ArrowLeft" => Some(Shortcut::PrevColumn),
        "ArrowRight" => Some(Shortcut::NextColumn),
        _ => None,
    }
}

/// Help overlay rows: key label and translation key.
pub const SHORTCUT_HELP: [(&str, &str); 8] = [
    ("Space / W", "shortcuts.watch"),
    ("Enter", "shortcuts.open"),
    ("Ctrl+R", "shortcuts.refresh"),
    ("Ctrl+L", "shortcuts.locale"),
    ("↑/↓", "shortcuts.videos"),
    ("←/→", "shortcuts.columns"),
    ("Esc", "shortcuts.close"),
    ("Shift+?", "shortcuts.help"),
];

/// Keyboard focus position on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Focus {
    /// Focused column index.
    pub column: usize,
    /// Focused video index inside the column, if any.
    pub video: Option<usize>,
}

/// Apply a navigation shortcut given the column count and per-column video counts.
#[must_use]
pub fn move_focus(focus: Focus, shortcut: Shortcut, videos_per_column: &[usize]) -> Focus {
    if videos_per_column.is_empty() {
        return Focus::default();
    }
    let last_column = videos_per_column.len() - 1;
    let column = focus.column.min(last_column);
    let len = videos_per_column[column];
    match shortcut {
        Shortcut::PrevColumn | Shortcut::NextColumn => {
            let next = if shortcut == Shortcut::PrevColumn {
                column.saturating_sub(1)
            } else {
                (column + 1).min(last_column)
            };
            Focus {
                column: next,
                video: (videos_per_column[next] > 0).then_some(0),
            }
        }
        Shortcut::NextVideo => Focus {
            column,
            video: match focus.video {
                None if len > 0 => Some(0),
                Some(idx) if idx + 1 < len => Some(idx + 1),
                other => other,
            },
        },
        Shortcut::PrevVideo => Focus {
            column,
            video: focus.video.map(|idx| idx.saturating_sub(1)),
        },
        _ => focus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_suppresses_shortcuts() {
        let typing = Modifiers {
            typing: true,
            ..Modifiers::default()
        };
        assert_eq!(interpret_shortcut("w", typing), None);
        assert_eq!(
            interpret_shortcut("w", Modifiers::default()),
            Some(Shortcut::WatchFocused)
        );
    }

    #[test]
    fn modifier_shortcuts_require_modifiers() {
        let command = Modifiers {
            command: true,
            ..Modifiers::default()
        };
        assert_eq!(interpret_shortcut("r", command), Some(Shortcut::Refresh));
        assert_eq!(interpret_shortcut("r", Modifiers::default()), None);
        assert_eq!(interpret_shortcut("L", command), Some(Shortcut::FocusLocale));
        let shift = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert_eq!(interpret_shortcut("?", shift), Some(Shortcut::ShowHelp));
    }

    #[test]
    fn focus_moves_are_clamped() {
        let counts = [2, 0, 3];
        let start = Focus::default();
        let first = move_focus(start, Shortcut::NextVideo, &counts);
        assert_eq!(first.video, Some(0));
        let second = move_focus(first, Shortcut::NextVideo, &counts);
        let third = move_focus(second, Shortcut::NextVideo, &counts);
        assert_eq!(third.video, Some(1));
        let left = move_focus(third, Shortcut::PrevColumn, &counts);
        assert_eq!(left.column, 0);
        let empty = move_focus(left, Shortcut::NextColumn, &counts);
        assert_eq!(empty, Focus { column: 1, video: None });
        let end = move_focus(
            move_focus(empty, Shortcut::NextColumn, &counts),
            Shortcut::NextColumn,
            &counts,
        );
        assert_eq!(end, Focus { column: 2, video: Some(0) });
    }
}
