//! Player detail screen: summary stats, score history sparkline, nemesis,
//! and the player's most-played cards with an image preview.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Sparkline},
};
use tokio::sync::watch;

use cardstats_api::StatsClient;
use cardstats_core::{
    CardCount, CardImageResolver, CellValue, Column, PlayerStats, RemoteResource, ResourceState,
    TableModel, format_stat,
};

use crate::action::Action;
use crate::component::Component;
use crate::screens::{move_selection, render_status};
use crate::theme;
use crate::widgets::card_preview::CardPreview;
use crate::widgets::table::render_table;

fn card_columns() -> Vec<Column<CardCount>> {
    vec![
        Column::new("card", "Card", |r: &CardCount| {
            CellValue::Text(r.card.clone())
        }),
        Column::new("count", "Count", |r: &CardCount| {
            CellValue::Int(i64::from(r.count))
        }),
    ]
}

pub struct PlayerScreen {
    resource: RemoteResource<PlayerStats>,
    updates: watch::Receiver<ResourceState<PlayerStats>>,
    name: Option<String>,
    stats: Option<Arc<PlayerStats>>,
    /// Score history scaled for the sparkline (hundredths of a point).
    score_bars: Vec<u64>,
    cards: TableModel<CardCount>,
    preview: CardPreview,
    selected_card: usize,
    selected_column: usize,
    loading: bool,
    failure: Option<String>,
}

impl PlayerScreen {
    pub fn new(client: StatsClient, resolver: Arc<CardImageResolver>) -> Self {
        let resource = RemoteResource::new(client);
        let updates = resource.subscribe();
        Self {
            resource,
            updates,
            name: None,
            stats: None,
            score_bars: Vec::new(),
            cards: TableModel::new(card_columns(), Vec::new()),
            preview: CardPreview::new(resolver),
            selected_card: 0,
            selected_column: 0,
            loading: false,
            failure: None,
        }
    }

    /// Target the screen at a player. Re-opening the same player keeps the
    /// already-fetched data; the endpoint string is the resource identity.
    pub fn open(&mut self, name: &str) {
        self.name = Some(name.to_owned());
        self.resource
            .set_endpoint(&StatsClient::player_stats_endpoint(name));
    }

    fn sync_preview(&mut self) {
        match self.cards.row(self.selected_card) {
            Some(row) => {
                let name = row.card.clone();
                self.preview.show(&name);
            }
            None => self.preview.clear(),
        }
    }

    fn apply(&mut self, state: &ResourceState<PlayerStats>) {
        match state {
            ResourceState::Idle => {}
            ResourceState::Loading => self.loading = true,
            ResourceState::Ready(data) => {
                self.loading = false;
                self.failure = None;
                self.cards.set_rows(data.cards.clone());
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    self.score_bars = data
                        .score_list
                        .iter()
                        .map(|s| (s.max(0.0) * 100.0) as u64)
                        .collect();
                }
                self.stats = Some(Arc::clone(data));
                self.selected_card = move_selection(self.selected_card, 0, self.cards.len());
                self.sync_preview();
            }
            ResourceState::Failed(failure) => {
                self.loading = false;
                self.failure = Some(failure.message.clone());
            }
        }
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.name {
            Some(name) => format!(" {name} "),
            None => " Player ".to_owned(),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let lines = match &self.stats {
            Some(stats) => {
                let mut lines = vec![Line::from(vec![
                    Span::styled("Rounds ", theme::dim()),
                    Span::raw(stats.n_rounds_played.to_string()),
                    Span::styled("   Wins ", theme::dim()),
                    Span::raw(stats.n_wins.to_string()),
                    Span::styled("   Elo ", theme::dim()),
                    Span::raw(format_stat(stats.elo)),
                    Span::styled("   Avg ", theme::dim()),
                    Span::raw(format_stat(stats.score_average)),
                    Span::styled("   Total ", theme::dim()),
                    Span::raw(format_stat(stats.score_total)),
                ])];
                if let Some(nemesis) = stats.nemesis.first() {
                    lines.push(Line::from(vec![
                        Span::styled("Nemesis ", theme::dim()),
                        Span::raw(format!(
                            "{} ({} matches, {} scored against)",
                            nemesis.player,
                            nemesis.n_matches,
                            format_stat(nemesis.score)
                        )),
                    ]));
                }
                lines
            }
            None => vec![Line::from(Span::styled("no data yet", theme::dim()))],
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_scores(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Score history ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let sparkline = Sparkline::default()
            .block(block)
            .data(&self.score_bars)
            .style(theme::title_style());
        frame.render_widget(sparkline, area);
    }
}

impl Component for PlayerScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_card = move_selection(self.selected_card, -1, self.cards.len());
                self.sync_preview();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_card = move_selection(self.selected_card, 1, self.cards.len());
                self.sync_preview();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column =
                    move_selection(self.selected_column, -1, self.cards.columns().len());
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_column =
                    move_selection(self.selected_column, 1, self.cards.columns().len());
            }
            KeyCode::Char('s') => {
                let id = self.cards.columns()[self.selected_column].id;
                self.cards.toggle_sort(id);
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
            Constraint::Length(4), // summary block
            Constraint::Length(5), // score sparkline
            Constraint::Min(1),    // cards + preview
            Constraint::Length(1), // status line
        ])
        .split(area);

        self.render_summary(frame, layout[0]);
        self.render_scores(frame, layout[1]);

        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(layout[2]);
        render_table(
            frame,
            panes[0],
            "Most played cards",
            &self.cards,
            (!self.cards.is_empty()).then_some(self.selected_card),
            self.selected_column,
            true,
        );
        self.preview.render(frame, panes[1]);

        render_status(
            frame,
            layout[3],
            self.loading,
            self.failure.as_deref(),
            "↑↓ select  ←→ column  s sort  r reload  Esc back",
        );
    }
}
