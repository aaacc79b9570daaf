//! Round detail screen: the submitted decks, their card lists with an
//! image preview, and the result matrix.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, BorderType, Borders, Cell, List, ListItem, ListState, Row, Table},
};
use tokio::sync::watch;

use cardstats_api::StatsClient;
use cardstats_core::{CardImageResolver, RemoteResource, ResourceState, Round, pad_score};

use crate::action::Action;
use crate::component::Component;
use crate::screens::{move_selection, render_status};
use crate::theme;
use crate::widgets::card_preview::CardPreview;

pub struct RoundScreen {
    resource: RemoteResource<Round>,
    updates: watch::Receiver<ResourceState<Round>>,
    number: Option<u32>,
    round: Option<Arc<Round>>,
    preview: CardPreview,
    selected_deck: usize,
    selected_card: usize,
    loading: bool,
    failure: Option<String>,
}

impl RoundScreen {
    pub fn new(client: StatsClient, resolver: Arc<CardImageResolver>) -> Self {
        let resource = RemoteResource::new(client);
        let updates = resource.subscribe();
        Self {
            resource,
            updates,
            number: None,
            round: None,
            preview: CardPreview::new(resolver),
            selected_deck: 0,
            selected_card: 0,
            loading: false,
            failure: None,
        }
    }

    /// Target the screen at a round number.
    pub fn open(&mut self, number: u32) {
        self.number = Some(number);
        self.resource.set_endpoint(&format!("round/{number}"));
    }

    fn deck_len(&self) -> usize {
        self.round.as_ref().map_or(0, |r| r.decks.len())
    }

    fn card_len(&self) -> usize {
        self.round
            .as_ref()
            .and_then(|r| r.decks.get(self.selected_deck))
            .map_or(0, |d| d.cards.len())
    }

    fn sync_preview(&mut self) {
        let card = self
            .round
            .as_ref()
            .and_then(|r| r.decks.get(self.selected_deck))
            .and_then(|d| d.cards.get(self.selected_card))
            .cloned();
        match card {
            Some(name) => self.preview.show(&name),
            None => self.preview.clear(),
        }
    }

    fn apply(&mut self, state: &ResourceState<Round>) {
        match state {
            ResourceState::Idle => {}
            ResourceState::Loading => self.loading = true,
            ResourceState::Ready(data) => {
                self.loading = false;
                self.failure = None;
                self.round = Some(Arc::clone(data));
                self.selected_deck = move_selection(self.selected_deck, 0, self.deck_len());
                self.selected_card = move_selection(self.selected_card, 0, self.card_len());
                self.sync_preview();
            }
            ResourceState::Failed(failure) => {
                self.loading = false;
                self.failure = Some(failure.message.clone());
            }
        }
    }

    fn render_decks(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = match &self.round {
            Some(r) => r
                .decks
                .iter()
                .map(|d| ListItem::new(Line::from(format!("{} — {}", d.index, d.player))))
                .collect(),
            None => Vec::new(),
        };

        let block = Block::default()
            .title(" Decks ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let list = List::new(items)
            .block(block)
            .highlight_style(theme::selected_row())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if self.deck_len() > 0 {
            state.select(Some(self.selected_deck));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let deck = self
            .round
            .as_ref()
            .and_then(|r| r.decks.get(self.selected_deck));
        let items: Vec<ListItem> = match deck {
            Some(d) => d
                .cards
                .iter()
                .map(|c| ListItem::new(Line::from(c.clone())))
                .collect(),
            None => Vec::new(),
        };

        let block = Block::default()
            .title(" Deck list ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let list = List::new(items)
            .block(block)
            .highlight_style(theme::selected_row())
            .highlight_symbol("> ");

        let mut state = ListState::default();
        if self.card_len() > 0 {
            state.select(Some(self.selected_card));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    /// The result matrix: one row per deck, one column per opposing deck,
    /// cells zero-padded to two characters like the score sheets.
    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Results ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let Some(round) = &self.round else {
            frame.render_widget(block, area);
            return;
        };

        let width = round
            .results
            .iter()
            .map(|r| r.values.len())
            .max()
            .unwrap_or(0);

        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain((0..width).map(|i| Cell::from(i.to_string())))
                .collect::<Vec<_>>(),
        )
        .style(theme::table_header());

        let rows = round.results.iter().map(|r| {
            Row::new(
                std::iter::once(Cell::from(r.index.to_string()))
                    .chain(r.values.iter().map(|v| Cell::from(pad_score(*v))))
                    .collect::<Vec<_>>(),
            )
            .style(theme::table_row())
        });

        let widths = vec![Constraint::Fill(1); width + 1];
        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }
}

impl Component for RoundScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_deck = move_selection(self.selected_deck, -1, self.deck_len());
                self.selected_card = 0;
                self.sync_preview();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_deck = move_selection(self.selected_deck, 1, self.deck_len());
                self.selected_card = 0;
                self.sync_preview();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_card = move_selection(self.selected_card, -1, self.card_len());
                self.sync_preview();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_card = move_selection(self.selected_card, 1, self.card_len());
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
            Constraint::Percentage(55), // decks + deck list + preview
            Constraint::Min(1),         // result matrix
            Constraint::Length(1),      // status line
        ])
        .split(area);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(40),
                Constraint::Percentage(35),
            ])
            .split(layout[0]);

        self.render_decks(frame, panes[0]);
        self.render_cards(frame, panes[1]);
        self.preview.render(frame, panes[2]);
        self.render_results(frame, layout[1]);

        render_status(
            frame,
            layout[2],
            self.loading,
            self.failure.as_deref(),
            "↑↓ deck  ←→ card  r reload  Esc back",
        );
    }
}
