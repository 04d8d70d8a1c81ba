use crate::grid::Vector2i;

/// Effect an item has on the snake when the head enters its cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ItemKind {
    /// Apple: grows the snake by one segment.
    Beneficial,
    /// Poison apple: shrinks the snake by one segment, never below one.
    Harmful,
    /// Stone: resets the snake.
    Obstacle,
}

/// A single-cell item on the board.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridItem {
    pub position: Vector2i,
    pub kind: ItemKind,
}

impl GridItem {
    #[must_use]
    pub fn new(kind: ItemKind, position: Vector2i) -> Self {
        Self { position, kind }
    }

    #[must_use]
    pub fn apple(position: Vector2i) -> Self {
        Self::new(ItemKind::Beneficial, position)
    }

    #[must_use]
    pub fn poison_apple(position: Vector2i) -> Self {
        Self::new(ItemKind::Harmful, position)
    }

    #[must_use]
    pub fn stone(position: Vector2i) -> Self {
        Self::new(ItemKind::Obstacle, position)
    }

    /// Returns true when `cell` is this item's cell.
    #[must_use]
    pub fn is_at(&self, cell: Vector2i) -> bool {
        self.position == cell
    }

    /// Moves the item to `position` in place.
    pub fn relocate(&mut self, position: Vector2i) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::{GridItem, ItemKind};
    use crate::grid::Vector2i;

    #[test]
    fn constructors_tag_kind() {
        let cell = Vector2i::new(3, 4);

        assert_eq!(GridItem::apple(cell).kind, ItemKind::Beneficial);
        assert_eq!(GridItem::poison_apple(cell).kind, ItemKind::Harmful);
        assert_eq!(GridItem::stone(cell).kind, ItemKind::Obstacle);
    }

    #[test]
    fn relocate_keeps_kind() {
        let mut stone = GridItem::stone(Vector2i::new(1, 1));

        stone.relocate(Vector2i::new(7, 2));

        assert!(stone.is_at(Vector2i::new(7, 2)));
        assert!(!stone.is_at(Vector2i::new(1, 1)));
        assert_eq!(stone.kind, ItemKind::Obstacle);
    }
}
