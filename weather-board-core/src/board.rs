/// View state of the favorites board.
///
/// Tracks whether the board currently shows the "no favorites" placeholder.
/// Updated only after a fetch, add or delete has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FavoritesBoard {
    empty: bool,
}

impl Default for FavoritesBoard {
    fn default() -> Self {
        Self { empty: true }
    }
}

impl FavoritesBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// The favorites list has been fetched and `shown` cities are on the board.
    pub fn on_favorites_loaded(&mut self, shown: usize) {
        self.empty = shown == 0;
    }

    /// A city was added. Returns `true` if the placeholder must be cleared
    /// before the new item is shown.
    pub fn on_city_added(&mut self) -> bool {
        std::mem::replace(&mut self.empty, false)
    }

    /// A city was deleted and `remaining` are left. Returns `true` if the
    /// placeholder must be shown again.
    pub fn on_city_deleted(&mut self, remaining: u64) -> bool {
        self.empty = remaining == 0;
        self.empty
    }
}
