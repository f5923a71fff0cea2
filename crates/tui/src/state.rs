//! Application state management.
//!
//! All mutable UI state lives in one explicit [`AppState`] object with
//! controlled mutation methods; no free-standing variables are shared
//! across handlers.

use nebula_protocol::{LaneKind, ScrumCard, ScrumbanBoard, ViewKind};

/// One entry in the (static) scenario library view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    /// Entry heading.
    pub title: String,
    /// Short description shown under the heading.
    pub description: String,
}

/// The application state.
///
/// Contains the active view, the text inputs, the Scrumban board with its
/// selection, overlay visibility, and transient status information.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The currently active view. Exactly one is active at a time.
    pub view: ViewKind,
    /// The chat input buffer.
    pub input: String,
    /// The search input buffer.
    pub search_query: String,
    /// Scroll-back offset for the transcript (0 = pinned to bottom).
    pub scroll: u16,
    /// The Scrumban board.
    pub board: ScrumbanBoard,
    /// Whether the board overlay is open.
    pub board_visible: bool,
    /// Index of the currently selected lane (0-3).
    pub selected_lane: usize,
    /// Index of the selected card within the current lane, if any.
    pub selected_card: Option<usize>,
    /// Whether the help overlay is visible.
    pub help_visible: bool,
    /// Last known credit balance; `None` renders as a placeholder.
    pub credits: Option<u64>,
    /// Transient status-bar notice.
    pub notice: Option<String>,
    /// Entries of the library view, loaded on first activation.
    pub library: Vec<LibraryEntry>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Creates the initial state: chat view, empty inputs, empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: ViewKind::Chat,
            input: String::new(),
            search_query: String::new(),
            scroll: 0,
            board: ScrumbanBoard::new(),
            board_visible: false,
            selected_lane: 0,
            selected_card: None,
            help_visible: false,
            credits: None,
            notice: None,
            library: Vec::new(),
        }
    }

    /// Activates a view.
    ///
    /// Exactly one view is active afterwards. Activating the already
    /// active view is an observable no-op. Activating the library loads
    /// its (static) content on first use.
    pub fn activate(&mut self, view: ViewKind) {
        if self.view == view {
            return;
        }

        self.view = view;
        self.scroll = 0;
        if view == ViewKind::Library && self.library.is_empty() {
            self.library = builtin_library();
        }
    }

    /// Switches to the next view in tab order.
    pub fn cycle_view(&mut self) {
        self.activate(self.view.next());
    }

    /// Returns the text input of the active view, if it has one.
    #[must_use]
    pub fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.view {
            ViewKind::Chat => Some(&mut self.input),
            ViewKind::Search => Some(&mut self.search_query),
            ViewKind::Library => None,
        }
    }

    /// Sets a transient status-bar notice.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Toggles the board overlay.
    pub fn toggle_board(&mut self) {
        self.board_visible = !self.board_visible;
        if self.board_visible {
            self.clamp_card_selection();
        }
    }

    /// Toggles the help overlay.
    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    /// Dismisses the help overlay if it is visible.
    ///
    /// Returns `true` if help was visible and has been dismissed.
    #[must_use]
    pub fn dismiss_help(&mut self) -> bool {
        if self.help_visible {
            self.help_visible = false;
            true
        } else {
            false
        }
    }

    /// Returns the lane kind currently selected on the board.
    #[must_use]
    pub fn selected_lane_kind(&self) -> LaneKind {
        LaneKind::from_index(self.selected_lane).unwrap_or_default()
    }

    /// Returns the currently selected card, if any.
    #[must_use]
    pub fn selected_card_ref(&self) -> Option<&ScrumCard> {
        let lane = self.board.lane(self.selected_lane_kind());
        self.selected_card.and_then(|idx| lane.cards.get(idx))
    }

    /// Moves the lane selection to the left, wrapping around.
    pub fn board_navigate_left(&mut self) {
        self.selected_lane = if self.selected_lane > 0 {
            self.selected_lane - 1
        } else {
            3
        };
        self.clamp_card_selection();
    }

    /// Moves the lane selection to the right, wrapping around.
    pub fn board_navigate_right(&mut self) {
        self.selected_lane = if self.selected_lane < 3 {
            self.selected_lane + 1
        } else {
            0
        };
        self.clamp_card_selection();
    }

    /// Moves the card selection up within the current lane, wrapping.
    pub fn board_navigate_up(&mut self) {
        let len = self.board.lane(self.selected_lane_kind()).len();
        if len == 0 {
            self.selected_card = None;
            return;
        }

        self.selected_card = Some(match self.selected_card {
            Some(idx) if idx > 0 => idx - 1,
            Some(_) => len - 1,
            None => 0,
        });
    }

    /// Moves the card selection down within the current lane, wrapping.
    pub fn board_navigate_down(&mut self) {
        let len = self.board.lane(self.selected_lane_kind()).len();
        if len == 0 {
            self.selected_card = None;
            return;
        }

        self.selected_card = Some(match self.selected_card {
            Some(idx) if idx + 1 < len => idx + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    /// Moves the selected card one lane to the left.
    ///
    /// Selection follows the card to the tail of its new lane. Returns
    /// `false` when nothing is selected or the card is already in the
    /// first lane.
    pub fn move_selected_card_left(&mut self) -> bool {
        let from = self.selected_lane_kind();
        match from.previous() {
            Some(to) => self.move_selected_card(from, to),
            None => false,
        }
    }

    /// Moves the selected card one lane to the right.
    pub fn move_selected_card_right(&mut self) -> bool {
        let from = self.selected_lane_kind();
        match from.next() {
            Some(to) => self.move_selected_card(from, to),
            None => false,
        }
    }

    fn move_selected_card(&mut self, from: LaneKind, to: LaneKind) -> bool {
        let Some(card) = self.selected_card_ref() else {
            return false;
        };
        let id = card.id;

        if !self.board.move_card(id, from, to) {
            return false;
        }

        // Follow the card to the tail of its new lane.
        self.selected_lane = to.index();
        self.selected_card = Some(self.board.lane(to).len() - 1);
        true
    }

    /// Keeps the card selection inside the current lane's bounds.
    fn clamp_card_selection(&mut self) {
        let len = self.board.lane(self.selected_lane_kind()).len();
        self.selected_card = match self.selected_card {
            _ if len == 0 => None,
            Some(idx) => Some(idx.min(len - 1)),
            None => None,
        };
    }
}

/// The static library content.
fn builtin_library() -> Vec<LibraryEntry> {
    vec![
        LibraryEntry {
            title: "📚 Scenario library".to_string(),
            description: "Saved Gherkin scenarios, reusable across sessions.".to_string(),
        },
        LibraryEntry {
            title: "🔍 Finding scenarios".to_string(),
            description: "Use the Search view to filter the conversation history.".to_string(),
        },
        LibraryEntry {
            title: "📋 Scrumban board".to_string(),
            description: "Completed chat turns land on the board as done cards. \
                          Open it with Ctrl+B."
                .to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_protocol::ViewKind;

    fn state_with_cards(count: usize) -> AppState {
        let mut state = AppState::new();
        for i in 0..count {
            state.board.add_card(ScrumCard::new(format!("card {i}")));
        }
        state
    }

    #[test]
    fn initial_state_shows_chat() {
        let state = AppState::new();
        assert_eq!(state.view, ViewKind::Chat);
        assert!(!state.board_visible);
        assert!(!state.help_visible);
    }

    #[test]
    fn activate_switches_to_exactly_one_view() {
        let mut state = AppState::new();

        for view in ViewKind::all() {
            state.activate(view);
            assert_eq!(state.view, view);
        }
    }

    #[test]
    fn activate_same_view_is_idempotent() {
        let mut state = AppState::new();
        state.activate(ViewKind::Search);
        state.search_query = "query".to_string();
        state.scroll = 4;

        let before = state.clone();
        state.activate(ViewKind::Search);

        assert_eq!(state.view, before.view);
        assert_eq!(state.search_query, before.search_query);
        assert_eq!(state.scroll, before.scroll);
    }

    #[test]
    fn activating_library_loads_content_once() {
        let mut state = AppState::new();
        assert!(state.library.is_empty());

        state.activate(ViewKind::Library);
        let loaded = state.library.clone();
        assert!(!loaded.is_empty());

        state.activate(ViewKind::Chat);
        state.activate(ViewKind::Library);
        assert_eq!(state.library, loaded);
    }

    #[test]
    fn cycle_visits_all_views_and_returns() {
        let mut state = AppState::new();
        state.cycle_view();
        assert_eq!(state.view, ViewKind::Search);
        state.cycle_view();
        assert_eq!(state.view, ViewKind::Library);
        state.cycle_view();
        assert_eq!(state.view, ViewKind::Chat);
    }

    #[test]
    fn active_input_follows_view() {
        let mut state = AppState::new();
        assert!(state.active_input_mut().is_some());

        state.activate(ViewKind::Library);
        assert!(state.active_input_mut().is_none());
    }

    #[test]
    fn lane_navigation_wraps() {
        let mut state = AppState::new();
        assert_eq!(state.selected_lane, 0);

        state.board_navigate_left();
        assert_eq!(state.selected_lane, 3);

        state.board_navigate_right();
        assert_eq!(state.selected_lane, 0);
    }

    #[test]
    fn card_navigation_wraps_within_lane() {
        let mut state = state_with_cards(3);

        state.board_navigate_down();
        assert_eq!(state.selected_card, Some(0));
        state.board_navigate_down();
        assert_eq!(state.selected_card, Some(1));
        state.board_navigate_up();
        assert_eq!(state.selected_card, Some(0));
        state.board_navigate_up();
        assert_eq!(state.selected_card, Some(2));
    }

    #[test]
    fn card_navigation_in_empty_lane_clears_selection() {
        let mut state = AppState::new();
        state.board_navigate_down();
        assert_eq!(state.selected_card, None);
    }

    #[test]
    fn move_selected_card_follows_to_new_lane() {
        let mut state = state_with_cards(1);
        state.board_navigate_down();

        assert!(state.move_selected_card_right());
        assert_eq!(state.selected_lane, LaneKind::Blocked.index());
        assert_eq!(state.selected_card, Some(0));
        assert_eq!(state.board.lane(LaneKind::Blocked).len(), 1);
        assert_eq!(state.board.total_cards(), 1);
    }

    #[test]
    fn move_without_selection_is_noop() {
        let mut state = state_with_cards(1);
        assert!(!state.move_selected_card_right());
        assert_eq!(state.board.lane(LaneKind::Todo).len(), 1);
    }

    #[test]
    fn move_off_board_edge_is_noop() {
        let mut state = state_with_cards(1);
        state.board_navigate_down();

        assert!(!state.move_selected_card_left());
        assert_eq!(state.board.lane(LaneKind::Todo).len(), 1);
    }

    #[test]
    fn toggle_board_clamps_stale_selection() {
        let mut state = state_with_cards(2);
        state.selected_card = Some(5);

        state.toggle_board();
        assert!(state.board_visible);
        assert_eq!(state.selected_card, Some(1));
    }

    #[test]
    fn help_toggle_and_dismiss() {
        let mut state = AppState::new();
        state.toggle_help();
        assert!(state.help_visible);

        assert!(state.dismiss_help());
        assert!(!state.help_visible);
        assert!(!state.dismiss_help());
    }
}
