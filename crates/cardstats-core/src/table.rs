// ── Sortable table model ──
//
// Column-driven, single-column sort state over an immutable row vector.
// Sorting permutes an index vector; the rows themselves never move, so
// clearing the sort restores the original order exactly. Purely
// presentational: no I/O, no async.

use std::cmp::Ordering;
use std::fmt;

use crate::format::format_stat;

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A typed cell value produced by a column accessor.
///
/// Numbers compare numerically (across `Int`/`Float`), text compares
/// lexically. Display uses [`format_stat`] for floats so table cells and
/// stat blocks render consistently.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl CellValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Text(_) => None,
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
        }
    }

    /// Default comparison: numeric when both sides are numbers,
    /// lexical otherwise.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => f.write_str(&format_stat(*v)),
        }
    }
}

/// Specification of one table column.
pub struct Column<R> {
    /// Stable identifier used by sort toggling.
    pub id: &'static str,
    /// Header label.
    pub label: &'static str,
    /// Extracts the cell value for a row.
    pub accessor: fn(&R) -> CellValue,
    /// Whether header activation sorts this column.
    pub sortable: bool,
    /// Overrides the default accessor-value comparison.
    pub comparator: Option<fn(&R, &R) -> Ordering>,
}

impl<R> Column<R> {
    pub fn new(id: &'static str, label: &'static str, accessor: fn(&R) -> CellValue) -> Self {
        Self {
            id,
            label,
            accessor,
            sortable: true,
            comparator: None,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn with_comparator(mut self, comparator: fn(&R, &R) -> Ordering) -> Self {
        self.comparator = Some(comparator);
        self
    }
}

/// Sortable table state: columns, rows, and the active sort.
///
/// Activating the same column cycles unsorted → ascending → descending →
/// unsorted; activating a different column starts it at ascending and
/// resets the previous one. One column sorts at a time.
pub struct TableModel<R> {
    columns: Vec<Column<R>>,
    rows: Vec<R>,
    sort: Option<(usize, SortDirection)>,
    order: Vec<usize>,
}

impl<R> TableModel<R> {
    pub fn new(columns: Vec<Column<R>>, rows: Vec<R>) -> Self {
        let order = (0..rows.len()).collect();
        Self {
            columns,
            rows,
            sort: None,
            order,
        }
    }

    /// Replace the rows (e.g. after a data refresh), keeping the sort state.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.resort();
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// The active sort as `(column id, direction)`, if any.
    pub fn sort_state(&self) -> Option<(&'static str, SortDirection)> {
        self.sort
            .map(|(idx, dir)| (self.columns[idx].id, dir))
    }

    /// Advance the sort cycle for the given column. Unknown or
    /// non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, column_id: &str) {
        let Some(idx) = self.columns.iter().position(|c| c.id == column_id) else {
            return;
        };
        if !self.columns[idx].sortable {
            return;
        }

        self.sort = match self.sort {
            Some((active, SortDirection::Ascending)) if active == idx => {
                Some((idx, SortDirection::Descending))
            }
            Some((active, SortDirection::Descending)) if active == idx => None,
            _ => Some((idx, SortDirection::Ascending)),
        };
        self.resort();
    }

    /// Rows in visual order.
    pub fn ordered_rows(&self) -> impl Iterator<Item = &R> {
        self.order.iter().map(|&i| &self.rows[i])
    }

    /// The row at a visual position.
    pub fn row(&self, visual: usize) -> Option<&R> {
        self.order.get(visual).map(|&i| &self.rows[i])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Recompute the visual order from the sort state. The sort is stable,
    /// so rows with equal keys keep their original relative order (for
    /// descending too — the comparator is reversed, not the output).
    fn resort(&mut self) {
        self.order = (0..self.rows.len()).collect();
        let Some((idx, direction)) = self.sort else {
            return;
        };

        let column = &self.columns[idx];
        let rows = &self.rows;
        self.order.sort_by(|&a, &b| {
            let ord = match column.comparator {
                Some(cmp) => cmp(&rows[a], &rows[b]),
                None => (column.accessor)(&rows[a]).compare(&(column.accessor)(&rows[b])),
            };
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::PopularCard;

    fn sample() -> TableModel<PopularCard> {
        let columns = vec![
            Column::new("card", "Card", |r: &PopularCard| {
                CellValue::Text(r.card.clone())
            }),
            Column::new("count", "Count", |r: &PopularCard| {
                CellValue::Int(i64::from(r.count))
            }),
            Column::new("percent", "%", |r: &PopularCard| CellValue::Float(r.percent)),
        ];
        let rows = vec![
            PopularCard { card: "Counterspell".into(), count: 9, percent: 3.375 },
            PopularCard { card: "Lightning Bolt".into(), count: 12, percent: 4.5 },
            PopularCard { card: "Brainstorm".into(), count: 9, percent: 3.375 },
        ];
        TableModel::new(columns, rows)
    }

    fn cards(model: &TableModel<PopularCard>) -> Vec<String> {
        model.ordered_rows().map(|r| r.card.clone()).collect()
    }

    #[test]
    fn sort_cycle_returns_to_original_order() {
        let mut model = sample();
        let original = cards(&model);

        model.toggle_sort("count");
        assert_eq!(model.sort_state(), Some(("count", SortDirection::Ascending)));

        model.toggle_sort("count");
        assert_eq!(model.sort_state(), Some(("count", SortDirection::Descending)));

        model.toggle_sort("count");
        assert_eq!(model.sort_state(), None);
        assert_eq!(cards(&model), original);
    }

    #[test]
    fn equal_keys_keep_original_relative_order() {
        let mut model = sample();

        model.toggle_sort("count");
        // Counterspell and Brainstorm tie on 9; Counterspell came first.
        assert_eq!(
            cards(&model),
            vec!["Counterspell", "Brainstorm", "Lightning Bolt"]
        );

        model.toggle_sort("count");
        // Descending: ties still keep original order.
        assert_eq!(
            cards(&model),
            vec!["Lightning Bolt", "Counterspell", "Brainstorm"]
        );
    }

    #[test]
    fn switching_column_resets_to_ascending() {
        let mut model = sample();

        model.toggle_sort("count");
        model.toggle_sort("count");
        assert_eq!(model.sort_state(), Some(("count", SortDirection::Descending)));

        model.toggle_sort("card");
        assert_eq!(model.sort_state(), Some(("card", SortDirection::Ascending)));
        assert_eq!(
            cards(&model),
            vec!["Brainstorm", "Counterspell", "Lightning Bolt"]
        );
    }

    #[test]
    fn unsortable_column_is_inert() {
        let columns = vec![
            Column::new("card", "Card", |r: &PopularCard| {
                CellValue::Text(r.card.clone())
            })
            .unsortable(),
        ];
        let rows = vec![
            PopularCard { card: "B".into(), count: 1, percent: 1.0 },
            PopularCard { card: "A".into(), count: 2, percent: 2.0 },
        ];
        let mut model = TableModel::new(columns, rows);

        model.toggle_sort("card");
        assert_eq!(model.sort_state(), None);
        assert_eq!(cards(&model), vec!["B", "A"]);
    }

    #[test]
    fn custom_comparator_wins_over_accessor() {
        let columns = vec![
            Column::new("card", "Card", |r: &PopularCard| {
                CellValue::Text(r.card.clone())
            })
            .with_comparator(|a, b| a.card.len().cmp(&b.card.len())),
        ];
        let rows = vec![
            PopularCard { card: "Lightning Bolt".into(), count: 1, percent: 1.0 },
            PopularCard { card: "Opt".into(), count: 2, percent: 2.0 },
        ];
        let mut model = TableModel::new(columns, rows);

        model.toggle_sort("card");
        assert_eq!(cards(&model), vec!["Opt", "Lightning Bolt"]);
    }

    #[test]
    fn popular_cards_row_renders_expected_cells() {
        // A popular_cards row with count 12 at 4.5% renders "12" and "4.5".
        let model = sample();
        let row = model.row(1).unwrap();

        let rendered: Vec<String> = model
            .columns()
            .iter()
            .map(|c| (c.accessor)(row).to_string())
            .collect();
        assert_eq!(rendered, vec!["Lightning Bolt", "12", "4.5"]);
    }

    #[test]
    fn int_and_float_compare_numerically() {
        assert_eq!(
            CellValue::Int(2).compare(&CellValue::Float(10.5)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Float(2.0).compare(&CellValue::Int(2)),
            Ordering::Equal
        );
    }
}
