//! Rendering for `cardstats-core`'s TableModel: header with sort
//! indicators, column selection highlight, stateful row selection.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState},
};

use cardstats_core::{SortDirection, TableModel};

use crate::theme;

/// Sorting indicator appended to a header label, same glyphs the old web
/// client used: ⏶ ascending, ⏷ descending, ⏺ unsorted.
pub fn sort_indicator(sort: Option<(&str, SortDirection)>, column_id: &str) -> &'static str {
    match sort {
        Some((id, SortDirection::Ascending)) if id == column_id => " \u{23f6}",
        Some((id, SortDirection::Descending)) if id == column_id => " \u{23f7}",
        _ => " \u{23fa}",
    }
}

/// Render a TableModel with row selection and a highlighted sort column.
pub fn render_table<R>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    model: &TableModel<R>,
    selected_row: Option<usize>,
    selected_column: usize,
    focused: bool,
) {
    let sort = model.sort_state();

    let header = Row::new(
        model
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let label = format!("{}{}", column.label, sort_indicator(sort, column.id));
                let style = if i == selected_column {
                    theme::selected_column()
                } else {
                    theme::table_header()
                };
                Cell::from(label).style(style)
            })
            .collect::<Vec<_>>(),
    );

    let rows = model.ordered_rows().map(|row| {
        Row::new(
            model
                .columns()
                .iter()
                .map(|column| Cell::from((column.accessor)(row).to_string()))
                .collect::<Vec<_>>(),
        )
        .style(theme::table_row())
    });

    let widths = vec![Constraint::Fill(1); model.columns().len()];

    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        });

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme::selected_row())
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(selected_row);
    frame.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_tracks_sort_state() {
        assert_eq!(sort_indicator(None, "elo"), " \u{23fa}");
        assert_eq!(
            sort_indicator(Some(("elo", SortDirection::Ascending)), "elo"),
            " \u{23f6}"
        );
        assert_eq!(
            sort_indicator(Some(("elo", SortDirection::Descending)), "elo"),
            " \u{23f7}"
        );
        // A different column's sort state does not leak over.
        assert_eq!(
            sort_indicator(Some(("wins", SortDirection::Ascending)), "elo"),
            " \u{23fa}"
        );
    }
}
