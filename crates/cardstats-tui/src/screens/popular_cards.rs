//! Popular Cards screen: a sortable table of card usage across all decks,
//! with an image preview for the highlighted card.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};
use tokio::sync::watch;

use cardstats_api::StatsClient;
use cardstats_core::{
    CardImageResolver, CellValue, Column, PopularCard, RemoteResource, ResourceState, TableModel,
};

use crate::action::Action;
use crate::component::Component;
use crate::screens::{move_selection, render_status};
use crate::widgets::card_preview::CardPreview;
use crate::widgets::table::render_table;

fn columns() -> Vec<Column<PopularCard>> {
    vec![
        Column::new("card", "Card", |r: &PopularCard| {
            CellValue::Text(r.card.clone())
        }),
        Column::new("count", "Count", |r: &PopularCard| {
            CellValue::Int(i64::from(r.count))
        }),
        Column::new("percent", "%", |r: &PopularCard| CellValue::Float(r.percent)),
    ]
}

pub struct PopularCardsScreen {
    resource: RemoteResource<Vec<PopularCard>>,
    updates: watch::Receiver<ResourceState<Vec<PopularCard>>>,
    table: TableModel<PopularCard>,
    preview: CardPreview,
    selected_row: usize,
    selected_column: usize,
    loading: bool,
    failure: Option<String>,
}

impl PopularCardsScreen {
    pub fn new(client: StatsClient, resolver: Arc<CardImageResolver>) -> Self {
        let resource = RemoteResource::new(client);
        let updates = resource.subscribe();
        Self {
            resource,
            updates,
            table: TableModel::new(columns(), Vec::new()),
            preview: CardPreview::new(resolver),
            selected_row: 0,
            selected_column: 0,
            loading: false,
            failure: None,
        }
    }

    /// Point the preview at whichever card is highlighted right now.
    fn sync_preview(&mut self) {
        match self.table.row(self.selected_row) {
            Some(row) => {
                let name = row.card.clone();
                self.preview.show(&name);
            }
            None => self.preview.clear(),
        }
    }

    fn apply(&mut self, state: &ResourceState<Vec<PopularCard>>) {
        match state {
            ResourceState::Idle => {}
            ResourceState::Loading => self.loading = true,
            ResourceState::Ready(data) => {
                self.loading = false;
                self.failure = None;
                self.table.set_rows(data.as_ref().clone());
                self.selected_row = move_selection(self.selected_row, 0, self.table.len());
                self.sync_preview();
            }
            ResourceState::Failed(failure) => {
                self.loading = false;
                self.failure = Some(failure.message.clone());
            }
        }
    }
}

impl Component for PopularCardsScreen {
    fn mount(&mut self) -> Result<()> {
        self.resource.set_endpoint("popular_cards");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = move_selection(self.selected_row, -1, self.table.len());
                self.sync_preview();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_row = move_selection(self.selected_row, 1, self.table.len());
                self.sync_preview();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column =
                    move_selection(self.selected_column, -1, self.table.columns().len());
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_column =
                    move_selection(self.selected_column, 1, self.table.columns().len());
            }
            KeyCode::Char('s') => {
                let id = self.table.columns()[self.selected_column].id;
                self.table.toggle_sort(id);
                // The highlight stays on the same visual position, so the
                // card under it changed.
                self.sync_preview();
            }
            KeyCode::Char('r') => self.resource.reload(),
            _ => {}
        }
        Ok(None)
    }

    fn tick(&mut self) {
        if self.updates.has_changed().unwrap_or(false) {
            let state = self.updates.borrow_and_update().clone();
            self.apply(&state);
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(1),    // table + preview
            Constraint::Length(1), // status line
        ])
        .split(area);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(layout[0]);

        render_table(
            frame,
            panes[0],
            "Popular Cards",
            &self.table,
            (!self.table.is_empty()).then_some(self.selected_row),
            self.selected_column,
            true,
        );
        self.preview.render(frame, panes[1]);

        render_status(
            frame,
            layout[1],
            self.loading,
            self.failure.as_deref(),
            "↑↓ select  ←→ column  s sort  r reload",
        );
    }
}
