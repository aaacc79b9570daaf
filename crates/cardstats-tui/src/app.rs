//! Application core — event loop, screen management, action dispatch.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use cardstats_api::StatsClient;
use cardstats_core::CardImageResolver;

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::hall_of_fame::HallOfFameScreen;
use crate::screens::player::PlayerScreen;
use crate::screens::popular_cards::PopularCardsScreen;
use crate::screens::round::RoundScreen;
use crate::theme;
use crate::tui::Tui;

/// The four screens. Concrete fields instead of trait objects in a map:
/// the drill-down screens need their `open` methods, which `Component`
/// does not carry.
struct Screens {
    hall_of_fame: HallOfFameScreen,
    popular_cards: PopularCardsScreen,
    player: PlayerScreen,
    round: RoundScreen,
}

impl Screens {
    fn get_mut(&mut self, id: ScreenId) -> &mut dyn Component {
        match id {
            ScreenId::HallOfFame => &mut self.hall_of_fame,
            ScreenId::PopularCards => &mut self.popular_cards,
            ScreenId::Player => &mut self.player,
            ScreenId::Round => &mut self.round,
        }
    }
}

/// Top-level application state and event loop.
pub struct App {
    screens: Screens,
    active_screen: ScreenId,
    /// Navigation history for GoBack (drill-downs can nest:
    /// hall of fame → player → round).
    back_stack: Vec<ScreenId>,
    running: bool,
    /// Action sender — handlers dispatch follow-up actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(stats: StatsClient, resolver: Arc<CardImageResolver>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens = Screens {
            hall_of_fame: HallOfFameScreen::new(stats.clone()),
            popular_cards: PopularCardsScreen::new(stats.clone(), Arc::clone(&resolver)),
            player: PlayerScreen::new(stats.clone(), Arc::clone(&resolver)),
            round: RoundScreen::new(stats, resolver),
        };

        Self {
            screens,
            active_screen: ScreenId::default(),
            back_stack: Vec::new(),
            running: true,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        // Kick off the initial screen's fetch.
        self.screens.get_mut(self.active_screen).mount()?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else goes to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),

            // Screen navigation via number keys
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                if let Some(screen) = ScreenId::from_number(c as u8 - b'0') {
                    return Ok(Some(Action::SwitchScreen(screen)));
                }
            }

            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        self.screens.get_mut(self.active_screen).handle_key_event(key)
    }

    fn switch_to(&mut self, target: ScreenId, push_history: bool) -> Result<()> {
        if target == self.active_screen {
            return Ok(());
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if push_history {
            self.back_stack.push(self.active_screen);
        }
        self.active_screen = target;
        self.screens.get_mut(target).mount()
    }

    /// Process a single action — update app state and propagate.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::SwitchScreen(target) => {
                // Tab-bar navigation resets the drill-down history.
                self.back_stack.clear();
                self.switch_to(*target, false)?;
            }

            Action::GoBack => {
                if let Some(prev) = self.back_stack.pop() {
                    self.switch_to(prev, false)?;
                }
            }

            Action::OpenPlayer(name) => {
                self.screens.player.open(name);
                self.switch_to(ScreenId::Player, true)?;
            }

            Action::OpenRound(number) => {
                self.screens.round.open(*number);
                self.switch_to(ScreenId::Round, true)?;
            }

            Action::Tick => {
                self.screens.get_mut(self.active_screen).tick();
            }

            // Render is handled in the main loop; resizes redraw naturally.
            Action::Render | Action::Resize(..) => {}
        }

        Ok(())
    }

    /// Render the full application frame.
    fn render(&mut self, frame: &mut Frame) {
        let layout = Layout::vertical([
            Constraint::Min(1),    // screen content
            Constraint::Length(1), // tab bar
        ])
        .split(frame.area());

        let active = self.active_screen;
        self.screens.get_mut(active).render(frame, layout[0]);
        self.render_tab_bar(frame, layout[1]);
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::TABS
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let style = if id == self.active_screen {
                    theme::selected_column()
                } else {
                    theme::dim()
                };
                Line::from(Span::styled(format!(" {} {} ", i + 1, id.label()), style))
            })
            .collect();

        let selected = ScreenId::TABS
            .iter()
            .position(|&s| s == self.active_screen);

        let mut tabs = Tabs::new(titles).divider(Span::styled(" ", theme::dim()));
        if let Some(selected) = selected {
            tabs = tabs.select(selected);
        }
        frame.render_widget(tabs, area);

        // Drill-down screens are not in the tab bar; show a breadcrumb.
        if selected.is_none() {
            let crumb = format!("{} (Esc to go back)", self.active_screen.label());
            let crumb_width = u16::try_from(crumb.len() + 1).unwrap_or(area.width);
            let x = area.width.saturating_sub(crumb_width);
            let crumb_area = Rect::new(area.x + x, area.y, area.width - x, area.height);
            frame.render_widget(
                Paragraph::new(Span::styled(crumb, theme::dim())),
                crumb_area,
            );
        }
    }
}
