//! Hall of Fame screen: the all-time player table plus the per-round
//! winner list. Enter on a player drills into their stats; Enter on a
//! round opens that round's decks.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
};
use tokio::sync::watch;

use cardstats_api::StatsClient;
use cardstats_core::{
    CellValue, Column, HallOfFame, PlayerSummary, RemoteResource, ResourceState, RoundWinners,
    TableModel,
};

use crate::action::Action;
use crate::component::Component;
use crate::screens::{move_selection, render_status};
use crate::theme;
use crate::widgets::table::render_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Players,
    Winners,
}

fn player_columns() -> Vec<Column<PlayerSummary>> {
    vec![
        Column::new("player", "Player", |r: &PlayerSummary| {
            CellValue::Text(r.player.clone())
        }),
        Column::new("rounds_played", "Rounds", |r: &PlayerSummary| {
            CellValue::Int(i64::from(r.rounds_played))
        }),
        Column::new("wins", "Wins", |r: &PlayerSummary| {
            CellValue::Int(i64::from(r.wins))
        }),
        Column::new("elo", "Elo", |r: &PlayerSummary| CellValue::Float(r.elo)),
        Column::new("score_mean", "Avg", |r: &PlayerSummary| {
            CellValue::Float(r.score_mean)
        }),
        Column::new("score_sum", "Total", |r: &PlayerSummary| {
            CellValue::Float(r.score_sum)
        }),
    ]
}

pub struct HallOfFameScreen {
    resource: RemoteResource<HallOfFame>,
    updates: watch::Receiver<ResourceState<HallOfFame>>,
    players: TableModel<PlayerSummary>,
    winners: Vec<RoundWinners>,
    pane: Pane,
    selected_player: usize,
    selected_winner: usize,
    selected_column: usize,
    loading: bool,
    failure: Option<String>,
}

impl HallOfFameScreen {
    pub fn new(client: StatsClient) -> Self {
        let resource = RemoteResource::new(client);
        let updates = resource.subscribe();
        Self {
            resource,
            updates,
            players: TableModel::new(player_columns(), Vec::new()),
            winners: Vec::new(),
            pane: Pane::Players,
            selected_player: 0,
            selected_winner: 0,
            selected_column: 0,
            loading: false,
            failure: None,
        }
    }

    fn apply(&mut self, state: &ResourceState<HallOfFame>) {
        match state {
            ResourceState::Idle => {}
            ResourceState::Loading => self.loading = true,
            ResourceState::Ready(data) => {
                self.loading = false;
                self.failure = None;
                self.players.set_rows(data.table.clone());
                self.winners = data.rounds.clone();
                self.selected_player = move_selection(self.selected_player, 0, self.players.len());
                self.selected_winner = move_selection(self.selected_winner, 0, self.winners.len());
            }
            ResourceState::Failed(failure) => {
                self.loading = false;
                self.failure = Some(failure.message.clone());
            }
        }
    }

    fn render_winners(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let items: Vec<ListItem> = self
            .winners
            .iter()
            .rev()
            .map(|w| {
                ListItem::new(Line::from(format!(
                    "Round {} — {}",
                    w.round,
                    w.winner.join(", ")
                )))
            })
            .collect();

        let block = Block::default()
            .title(" Rounds ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let list = List::new(items)
            .block(block)
            .highlight_style(theme::selected_row())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.winners.is_empty() {
            state.select(Some(self.selected_winner));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl Component for HallOfFameScreen {
    fn mount(&mut self) -> Result<()> {
        // Identity is the endpoint string, so re-mounting does not refetch.
        self.resource.set_endpoint("hall_of_fame");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Tab => {
                self.pane = match self.pane {
                    Pane::Players => Pane::Winners,
                    Pane::Winners => Pane::Players,
                };
            }
            KeyCode::Up | KeyCode::Char('k') => match self.pane {
                Pane::Players => {
                    self.selected_player =
                        move_selection(self.selected_player, -1, self.players.len());
                }
                Pane::Winners => {
                    self.selected_winner =
                        move_selection(self.selected_winner, -1, self.winners.len());
                }
            },
            KeyCode::Down | KeyCode::Char('j') => match self.pane {
                Pane::Players => {
                    self.selected_player =
                        move_selection(self.selected_player, 1, self.players.len());
                }
                Pane::Winners => {
                    self.selected_winner =
                        move_selection(self.selected_winner, 1, self.winners.len());
                }
            },
            KeyCode::Left | KeyCode::Char('h') if self.pane == Pane::Players => {
                self.selected_column =
                    move_selection(self.selected_column, -1, self.players.columns().len());
            }
            KeyCode::Right | KeyCode::Char('l') if self.pane == Pane::Players => {
                self.selected_column =
                    move_selection(self.selected_column, 1, self.players.columns().len());
            }
            KeyCode::Char('s') if self.pane == Pane::Players => {
                let id = self.players.columns()[self.selected_column].id;
                self.players.toggle_sort(id);
            }
            KeyCode::Char('r') => self.resource.reload(),
            KeyCode::Enter => match self.pane {
                Pane::Players => {
                    if let Some(row) = self.players.row(self.selected_player) {
                        return Ok(Some(Action::OpenPlayer(row.player.clone())));
                    }
                }
                Pane::Winners => {
                    // The list renders most recent first.
                    if let Some(w) = self.winners.iter().rev().nth(self.selected_winner) {
                        return Ok(Some(Action::OpenRound(w.round)));
                    }
                }
            },
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
            Constraint::Min(1),    // tables
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
            "Hall of Fame",
            &self.players,
            (!self.players.is_empty()).then_some(self.selected_player),
            self.selected_column,
            self.pane == Pane::Players,
        );
        self.render_winners(frame, panes[1], self.pane == Pane::Winners);

        render_status(
            frame,
            layout[1],
            self.loading,
            self.failure.as_deref(),
            "↑↓ select  ←→ column  s sort  Tab pane  Enter open  r reload",
        );
    }
}
