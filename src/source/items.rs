//! Item source shapes.
//!
//! The engine is generic over the item-source state type. It only needs to
//! recognize the one variant that carries a list; every other shape counts
//! as "not ready".

/// Recognizer for the "has items" shape of an item-source state.
pub trait ItemSourceState {
    type Item;

    /// The items, if this state carries them.
    fn items(&self) -> Option<&[Self::Item]>;
}

/// Stock item-source state for producers without a shape of their own.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SourceState<I> {
    #[default]
    Idle,
    Loading,
    Failed(String),
    Ready { items: Vec<I> },
}

impl<I> SourceState<I> {
    pub fn ready(items: Vec<I>) -> Self {
        Self::Ready { items }
    }
}

impl<I> ItemSourceState for SourceState<I> {
    type Item = I;

    fn items(&self) -> Option<&[I]> {
        match self {
            Self::Ready { items } => Some(items),
            _ => None,
        }
    }
}
