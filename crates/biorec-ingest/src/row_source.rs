/// A single-pass cursor over staged import rows.
///
/// The cursor starts before the first row; `move_next` must be called before
/// any cell access. Implementations stage their input up front so that
/// `row_count` is known before the row loop begins.
pub trait RowSource {
    /// Advances to the next row. Returns `false` once the source is
    /// exhausted.
    fn move_next(&mut self) -> bool;

    /// Total number of staged rows.
    fn row_count(&self) -> usize;

    /// Number of source columns.
    fn column_count(&self) -> usize;

    /// Header name of column `index`, if it exists.
    fn column_name(&self, index: usize) -> Option<&str>;

    /// Value of column `index` in the current row. `None` before the first
    /// `move_next`, after exhaustion, or when the row has no cell at that
    /// index.
    fn value(&self, index: usize) -> Option<&str>;

    /// Copies the current row into the error store together with the reason
    /// it was rejected.
    fn route_current_to_errors(&mut self, message: &str);

    /// Number of rows routed to the error store so far.
    fn error_count(&self) -> usize;
}
