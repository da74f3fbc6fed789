//! Like / dislike counters and star ratings.
//!
//! These counters change independently of the file tree and never make the
//! pending-change transaction dirty.

use super::node::Note;

/// The viewer's current reaction to a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reaction {
    #[default]
    None,
    Liked,
    Disliked,
}

impl Reaction {
    /// Toggle a like: liking twice withdraws it, liking a disliked note
    /// moves the vote across.
    pub fn toggle_like(self, note: &mut Note) -> Reaction {
        match self {
            Reaction::Liked => {
                note.like_count = note.like_count.saturating_sub(1);
                Reaction::None
            }
            Reaction::Disliked => {
                note.dislike_count = note.dislike_count.saturating_sub(1);
                note.like_count += 1;
                Reaction::Liked
            }
            Reaction::None => {
                note.like_count += 1;
                Reaction::Liked
            }
        }
    }

    /// Mirror image of [`Reaction::toggle_like`].
    pub fn toggle_dislike(self, note: &mut Note) -> Reaction {
        match self {
            Reaction::Disliked => {
                note.dislike_count = note.dislike_count.saturating_sub(1);
                Reaction::None
            }
            Reaction::Liked => {
                note.like_count = note.like_count.saturating_sub(1);
                note.dislike_count += 1;
                Reaction::Disliked
            }
            Reaction::None => {
                note.dislike_count += 1;
                Reaction::Disliked
            }
        }
    }
}

/// Star ratings range from one to five.
pub const MAX_STARS: u8 = 5;

pub fn valid_stars(stars: u8) -> bool {
    (1..=MAX_STARS).contains(&stars)
}
