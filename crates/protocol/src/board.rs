//! Scrumban board types and structures.
//!
//! This module defines the board layout types including lanes and the
//! overall board structure that organizes cards. A card belongs to exactly
//! one lane at any time, and the only lane mutation is an explicit
//! [`ScrumbanBoard::move_card`] transition, so the lane state machine is
//! testable without simulating any pointer input.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a card.
///
/// Ids are derived from the creation timestamp (milliseconds since epoch)
/// and forced strictly monotonic within a process, so concurrent creations
/// in the same millisecond still get distinct ids.
pub type CardId = u64;

/// Maximum length of a card title derived from a chat message.
const TITLE_MAX_CHARS: usize = 50;

/// Returns the next card id.
///
/// Ids track wall-clock milliseconds but never repeat or go backwards.
fn next_card_id() -> CardId {
    static LAST: AtomicU64 = AtomicU64::new(0);

    let now = Utc::now().timestamp_millis().max(0) as u64;
    let mut last = LAST.load(Ordering::SeqCst);
    loop {
        let candidate = now.max(last + 1);
        match LAST.compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

/// Truncates a chat message into a card title.
///
/// Titles are capped at 50 characters; longer messages get a trailing
/// `...`.
///
/// # Examples
///
/// ```
/// use nebula_protocol::truncate_title;
///
/// assert_eq!(truncate_title("short"), "short");
///
/// let long = "x".repeat(60);
/// let title = truncate_title(&long);
/// assert!(title.ends_with("..."));
/// assert_eq!(title.chars().count(), 53);
/// ```
#[must_use]
pub fn truncate_title(text: &str) -> String {
    if text.chars().count() <= TITLE_MAX_CHARS {
        text.to_string()
    } else {
        let mut title: String = text.chars().take(TITLE_MAX_CHARS).collect();
        title.push_str("...");
        title
    }
}

/// The type of lane on the Scrumban board.
///
/// Represents the workflow stages that cards move through.
///
/// # Examples
///
/// ```
/// use nebula_protocol::LaneKind;
///
/// let lane = LaneKind::InProgress;
/// assert_eq!(lane.display_name(), "In Progress");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LaneKind {
    /// Cards waiting to be picked up.
    #[default]
    Todo,
    /// Cards that cannot progress right now.
    Blocked,
    /// Cards currently being worked on.
    #[serde(rename = "inprogress")]
    InProgress,
    /// Completed cards.
    Done,
}

impl LaneKind {
    /// Returns all lane kinds in board order.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::LaneKind;
    ///
    /// let lanes = LaneKind::all();
    /// assert_eq!(lanes.len(), 4);
    /// assert_eq!(lanes[0], LaneKind::Todo);
    /// ```
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Todo, Self::Blocked, Self::InProgress, Self::Done]
    }

    /// Returns a human-readable display name for the lane.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::Blocked => "Blocked",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Returns the index of this lane on the board (0-3).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Todo => 0,
            Self::Blocked => 1,
            Self::InProgress => 2,
            Self::Done => 3,
        }
    }

    /// Creates a `LaneKind` from its index.
    ///
    /// Returns `None` if the index is out of range (>= 4).
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::LaneKind;
    ///
    /// assert_eq!(LaneKind::from_index(0), Some(LaneKind::Todo));
    /// assert_eq!(LaneKind::from_index(4), None);
    /// ```
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Todo),
            1 => Some(Self::Blocked),
            2 => Some(Self::InProgress),
            3 => Some(Self::Done),
            _ => None,
        }
    }

    /// Returns the next lane on the board, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Returns the previous lane on the board, if any.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self.index().checked_sub(1) {
            Some(idx) => Self::from_index(idx),
            None => None,
        }
    }
}

/// A card on the Scrumban board.
///
/// The lane is the only mutable field; it changes solely through
/// [`ScrumbanBoard::move_card`] or, for completed chat turns, the initial
/// insertion into `Done`.
///
/// # Examples
///
/// ```
/// use nebula_protocol::{LaneKind, ScrumCard};
///
/// let card = ScrumCard::new("Write acceptance tests");
/// assert_eq!(card.lane, LaneKind::Todo);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrumCard {
    /// Unique identifier for this card.
    pub id: CardId,
    /// Short summary shown on the board.
    pub title: String,
    /// Which lane this card currently resides in.
    pub lane: LaneKind,
    /// When this card was created.
    pub created_at: DateTime<Utc>,
}

impl ScrumCard {
    /// Creates a new card in the `Todo` lane.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::ScrumCard;
    ///
    /// let card = ScrumCard::new("Review checkout flow");
    /// assert_eq!(card.title, "Review checkout flow");
    /// ```
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_lane(title, LaneKind::Todo)
    }

    /// Creates a new card in a specific lane.
    ///
    /// Used by the chat session to log completed turns directly into
    /// `Done`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::{LaneKind, ScrumCard};
    ///
    /// let card = ScrumCard::with_lane("Generate a login scenario", LaneKind::Done);
    /// assert_eq!(card.lane, LaneKind::Done);
    /// ```
    #[must_use]
    pub fn with_lane(title: impl Into<String>, lane: LaneKind) -> Self {
        Self {
            id: next_card_id(),
            title: title.into(),
            lane,
            created_at: Utc::now(),
        }
    }
}

/// A single lane (column) on the Scrumban board.
///
/// Insertion order within a lane reflects move/creation recency, not
/// priority: moved cards always land at the tail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    /// The type of this lane.
    pub kind: LaneKind,
    /// Cards currently in this lane, ordered by arrival.
    pub cards: Vec<ScrumCard>,
}

impl Lane {
    /// Creates a new empty lane of the specified kind.
    #[must_use]
    pub const fn new(kind: LaneKind) -> Self {
        Self {
            kind,
            cards: Vec::new(),
        }
    }

    /// Returns the number of cards in this lane.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` if the lane has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Appends a card to the tail of this lane.
    ///
    /// Note: this does not update the card's `lane` field. Use
    /// [`ScrumbanBoard::move_card`] for lane transitions.
    pub fn add_card(&mut self, card: ScrumCard) {
        self.cards.push(card);
    }

    /// Removes and returns a card by id, if present in this lane.
    pub fn remove_card(&mut self, id: CardId) -> Option<ScrumCard> {
        let pos = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(pos))
    }

    /// Returns a reference to a card by id, if present in this lane.
    #[must_use]
    pub fn get_card(&self, id: CardId) -> Option<&ScrumCard> {
        self.cards.iter().find(|c| c.id == id)
    }
}

/// A Scrumban board with four fixed lanes.
///
/// Invariant: every card belongs to exactly one lane, and the total card
/// count is conserved across any lane-to-lane move.
///
/// # Examples
///
/// ```
/// use nebula_protocol::{LaneKind, ScrumCard, ScrumbanBoard};
///
/// let mut board = ScrumbanBoard::new();
/// let card = ScrumCard::new("Map the signup flow");
/// let id = card.id;
///
/// board.add_card(card);
/// assert!(board.move_card(id, LaneKind::Todo, LaneKind::InProgress));
/// assert_eq!(board.card_lane(id), Some(LaneKind::InProgress));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrumbanBoard {
    /// The four lanes of the board, indexed by [`LaneKind::index`].
    pub lanes: [Lane; 4],
}

impl Default for ScrumbanBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrumbanBoard {
    /// Creates a new empty board with four lanes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lanes: [
                Lane::new(LaneKind::Todo),
                Lane::new(LaneKind::Blocked),
                Lane::new(LaneKind::InProgress),
                Lane::new(LaneKind::Done),
            ],
        }
    }

    /// Returns a reference to the lane of the specified kind.
    #[must_use]
    pub fn lane(&self, kind: LaneKind) -> &Lane {
        &self.lanes[kind.index()]
    }

    /// Returns a mutable reference to the lane of the specified kind.
    #[must_use]
    pub fn lane_mut(&mut self, kind: LaneKind) -> &mut Lane {
        &mut self.lanes[kind.index()]
    }

    /// Adds a card to its designated lane based on `card.lane`.
    pub fn add_card(&mut self, card: ScrumCard) {
        let lane_kind = card.lane;
        self.lane_mut(lane_kind).add_card(card);
    }

    /// Finds and returns a reference to a card by id across all lanes.
    #[must_use]
    pub fn get_card(&self, id: CardId) -> Option<&ScrumCard> {
        self.lanes.iter().find_map(|lane| lane.get_card(id))
    }

    /// Returns the lane currently holding the card with the given id.
    #[must_use]
    pub fn card_lane(&self, id: CardId) -> Option<LaneKind> {
        self.lanes
            .iter()
            .find(|lane| lane.get_card(id).is_some())
            .map(|lane| lane.kind)
    }

    /// Moves a card from one lane to another.
    ///
    /// The move only happens when the card with `id` actually resides in
    /// `from` and `from != to`; otherwise the board is left untouched and
    /// `false` is returned. A successful move removes the card from `from`
    /// and appends it to the tail of `to`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nebula_protocol::{LaneKind, ScrumCard, ScrumbanBoard};
    ///
    /// let mut board = ScrumbanBoard::new();
    /// let card = ScrumCard::new("Card");
    /// let id = card.id;
    /// board.add_card(card);
    ///
    /// // Mismatched from-lane is a no-op.
    /// assert!(!board.move_card(id, LaneKind::Done, LaneKind::Todo));
    /// assert!(board.move_card(id, LaneKind::Todo, LaneKind::Done));
    /// ```
    pub fn move_card(&mut self, id: CardId, from: LaneKind, to: LaneKind) -> bool {
        if from == to {
            return false;
        }

        let Some(mut card) = self.lane_mut(from).remove_card(id) else {
            return false;
        };

        card.lane = to;
        self.lane_mut(to).add_card(card);
        true
    }

    /// Moves a card to a lane regardless of where it currently lives.
    ///
    /// Used by the server's board routes, which address cards by id only.
    /// Returns `false` when the id is unknown or the card is already in
    /// `to`.
    pub fn relocate_card(&mut self, id: CardId, to: LaneKind) -> bool {
        match self.card_lane(id) {
            Some(from) => self.move_card(id, from, to),
            None => false,
        }
    }

    /// Returns the total number of cards across all lanes.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.lanes.iter().map(Lane::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lane_kind_all_returns_four_lanes() {
        let all = LaneKind::all();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], LaneKind::Todo);
        assert_eq!(all[1], LaneKind::Blocked);
        assert_eq!(all[2], LaneKind::InProgress);
        assert_eq!(all[3], LaneKind::Done);
    }

    #[test]
    fn lane_kind_index_roundtrip() {
        for kind in LaneKind::all() {
            assert_eq!(LaneKind::from_index(kind.index()), Some(kind));
        }
    }

    #[test]
    fn lane_kind_navigation() {
        assert_eq!(LaneKind::Todo.next(), Some(LaneKind::Blocked));
        assert_eq!(LaneKind::Done.next(), None);
        assert_eq!(LaneKind::Blocked.previous(), Some(LaneKind::Todo));
        assert_eq!(LaneKind::Todo.previous(), None);
    }

    #[test]
    fn lane_kind_json_format() {
        // The wire format matches the backend's column keys.
        let json = serde_json::to_string(&LaneKind::InProgress).expect("serialize");
        assert_eq!(json, r#""inprogress""#);

        let json = serde_json::to_string(&LaneKind::Todo).expect("serialize");
        assert_eq!(json, r#""todo""#);
    }

    #[test]
    fn card_ids_are_unique_and_increasing() {
        let a = ScrumCard::new("a");
        let b = ScrumCard::new("b");
        let c = ScrumCard::new("c");

        assert!(a.id < b.id);
        assert!(b.id < c.id);
    }

    #[test]
    fn truncate_title_short_text_unchanged() {
        assert_eq!(truncate_title("Generate a login scenario"), "Generate a login scenario");
    }

    #[test]
    fn truncate_title_caps_at_fifty_chars() {
        let text = "a".repeat(51);
        let title = truncate_title(&text);
        assert_eq!(title, format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn truncate_title_handles_multibyte_boundaries() {
        let text = "é".repeat(60);
        let title = truncate_title(&text);
        assert_eq!(title.chars().count(), 53);
    }

    #[test]
    fn lane_operations() {
        let mut lane = Lane::new(LaneKind::Todo);
        assert!(lane.is_empty());

        let card = ScrumCard::new("Card");
        let id = card.id;
        lane.add_card(card);

        assert_eq!(lane.len(), 1);
        assert!(lane.get_card(id).is_some());

        let removed = lane.remove_card(id);
        assert!(removed.is_some());
        assert!(lane.is_empty());
    }

    #[test]
    fn board_add_and_find_card() {
        let mut board = ScrumbanBoard::new();
        let card = ScrumCard::with_lane("Done card", LaneKind::Done);
        let id = card.id;

        board.add_card(card);

        assert_eq!(board.total_cards(), 1);
        assert_eq!(board.card_lane(id), Some(LaneKind::Done));
        assert_eq!(board.lane(LaneKind::Done).len(), 1);
    }

    #[test]
    fn board_move_card_appends_to_tail() {
        let mut board = ScrumbanBoard::new();
        let early = ScrumCard::with_lane("early", LaneKind::Done);
        let moved = ScrumCard::new("moved");
        let moved_id = moved.id;
        board.add_card(early);
        board.add_card(moved);

        assert!(board.move_card(moved_id, LaneKind::Todo, LaneKind::Done));

        let done = board.lane(LaneKind::Done);
        assert_eq!(done.len(), 2);
        assert_eq!(done.cards[1].id, moved_id);
        assert_eq!(done.cards[1].lane, LaneKind::Done);
    }

    #[test]
    fn board_move_unknown_card_is_noop() {
        let mut board = ScrumbanBoard::new();
        board.add_card(ScrumCard::new("present"));

        assert!(!board.move_card(u64::MAX, LaneKind::Todo, LaneKind::Done));
        assert_eq!(board.lane(LaneKind::Todo).len(), 1);
        assert_eq!(board.lane(LaneKind::Done).len(), 0);
    }

    #[test]
    fn board_move_mismatched_from_lane_is_noop() {
        let mut board = ScrumbanBoard::new();
        let card = ScrumCard::new("todo card");
        let id = card.id;
        board.add_card(card);

        // Card lives in Todo, not Done: both lanes stay unchanged.
        assert!(!board.move_card(id, LaneKind::Done, LaneKind::Todo));
        assert_eq!(board.card_lane(id), Some(LaneKind::Todo));
        assert_eq!(board.total_cards(), 1);
    }

    #[test]
    fn board_move_to_same_lane_is_noop() {
        let mut board = ScrumbanBoard::new();
        let card = ScrumCard::new("card");
        let id = card.id;
        board.add_card(card);

        assert!(!board.move_card(id, LaneKind::Todo, LaneKind::Todo));
        assert_eq!(board.lane(LaneKind::Todo).len(), 1);
    }

    #[test]
    fn board_relocate_finds_current_lane() {
        let mut board = ScrumbanBoard::new();
        let card = ScrumCard::new("card");
        let id = card.id;
        board.add_card(card);

        assert!(board.relocate_card(id, LaneKind::Blocked));
        assert_eq!(board.card_lane(id), Some(LaneKind::Blocked));
        assert!(!board.relocate_card(id, LaneKind::Blocked));
        assert!(!board.relocate_card(u64::MAX, LaneKind::Done));
    }

    #[test]
    fn board_serialization_roundtrip() {
        let mut board = ScrumbanBoard::new();
        board.add_card(ScrumCard::new("Card 1"));
        board.add_card(ScrumCard::with_lane("Card 2", LaneKind::Done));

        let json = serde_json::to_string(&board).expect("serialize");
        let parsed: ScrumbanBoard = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(board, parsed);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    impl Arbitrary for LaneKind {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            prop_oneof![
                Just(LaneKind::Todo),
                Just(LaneKind::Blocked),
                Just(LaneKind::InProgress),
                Just(LaneKind::Done),
            ]
            .boxed()
        }
    }

    proptest! {
        /// Lane kind serialization is deterministic and roundtrips.
        #[test]
        fn lane_kind_roundtrip(kind in any::<LaneKind>()) {
            let json = serde_json::to_string(&kind).expect("serialize");
            let parsed: LaneKind = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(kind, parsed);
        }

        /// Any sequence of moves conserves the total card count.
        #[test]
        fn moves_conserve_card_count(
            titles in proptest::collection::vec("[a-z]{1,12}", 1..8),
            moves in proptest::collection::vec(
                (0usize..8, any::<LaneKind>(), any::<LaneKind>()),
                0..32,
            ),
        ) {
            let mut board = ScrumbanBoard::new();
            let mut ids = Vec::new();
            for title in &titles {
                let card = ScrumCard::new(title.clone());
                ids.push(card.id);
                board.add_card(card);
            }
            let total = board.total_cards();

            for (idx, from, to) in moves {
                let id = ids[idx % ids.len()];
                board.move_card(id, from, to);
                prop_assert_eq!(board.total_cards(), total);
            }

            // Every card still lives in exactly one lane.
            for id in ids {
                let holders = board
                    .lanes
                    .iter()
                    .filter(|lane| lane.get_card(id).is_some())
                    .count();
                prop_assert_eq!(holders, 1);
            }
        }

        /// Truncated titles never exceed 53 characters.
        #[test]
        fn truncate_title_bounded(text in "\\PC{0,120}") {
            let title = truncate_title(&text);
            prop_assert!(title.chars().count() <= 53);
        }
    }
}
