use crate::color::Color;
use crate::error::CoreError;

/// Grille carrée de couleurs canoniques, row-major.
///
/// Jamais redimensionnée en place : `resize` réalloue une grille neuve.
///
/// # Example
/// ```
/// use ts_core::grid::GridBuffer;
/// use ts_core::color::Color;
/// let mut grid = GridBuffer::new(4).unwrap();
/// grid.set(1, 2, "#EF4444");
/// assert_eq!(grid.get(1, 2), Some(Color::from_rgb(0xef, 0x44, 0x44)));
/// assert_eq!(grid.get(0, 0), Some(Color::WHITE));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridBuffer {
    size: usize,
    cells: Vec<Color>,
}

/// Côté maximal accepté, y compris pour une carte importée.
pub const MAX_GRID_SIZE: usize = 256;

impl GridBuffer {
    /// Crée une grille `size × size`, toutes les cellules à `#ffffff`.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidGridSize` if `size` is zero or above
    /// [`MAX_GRID_SIZE`].
    pub fn new(size: usize) -> Result<Self, CoreError> {
        let cell_count = match size.checked_mul(size) {
            Some(n) if (1..=MAX_GRID_SIZE).contains(&size) => n,
            _ => {
                log::warn!("Taille de grille refusée : {size}");
                return Err(CoreError::InvalidGridSize { size });
            }
        };
        Ok(Self {
            size,
            cells: vec![Color::WHITE; cell_count],
        })
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }

    /// Color at `(row, col)`, `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Écrit `color` (normalisée) en `(row, col)`.
    ///
    /// Hors limites : no-op, retourne `false`.
    pub fn set(&mut self, row: usize, col: usize, color: impl Into<Color>) -> bool {
        let Some(i) = self.index(row, col) else {
            log::trace!("Écriture hors grille ignorée : ({row}, {col})");
            return false;
        };
        self.cells[i] = color.into();
        true
    }

    /// Remplit toute la grille avec `color`.
    ///
    /// # Example
    /// ```
    /// use ts_core::grid::GridBuffer;
    /// let mut grid = GridBuffer::new(3).unwrap();
    /// grid.fill("#000");
    /// assert!(grid.rows().flatten().all(|c| c.to_string() == "#000000"));
    /// ```
    pub fn fill(&mut self, color: impl Into<Color>) {
        let color = color.into();
        self.cells.fill(color);
    }

    /// Equivalent to `fill(Color::WHITE)`.
    pub fn clear(&mut self) {
        self.fill(Color::WHITE);
    }

    /// Remplace la grille par une grille neuve de `new_size`. Aucun contenu conservé,
    /// même si la taille est inchangée.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidGridSize` if `new_size` is zero; the current
    /// grid is left untouched in that case.
    pub fn resize(&mut self, new_size: usize) -> Result<(), CoreError> {
        *self = Self::new(new_size)?;
        log::debug!("Grille réallouée : {new_size}×{new_size}");
        Ok(())
    }

    /// Lignes dans l'ordre, chacune de `size` cellules.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.cells.chunks_exact(self.size)
    }

    /// Flat row-major view.
    #[must_use]
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }
}
