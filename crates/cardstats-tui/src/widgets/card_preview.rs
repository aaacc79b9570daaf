//! Card preview pane.
//!
//! Shows the resolved image URL for the currently highlighted card name.
//! Selection drives VISIBILITY only — the fetch happens once per distinct
//! name through the shared resolver, whose cache and in-flight dedup make
//! re-highlighting a card free. A generation counter discards resolutions
//! that finish after the highlight moved on.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use tokio::sync::watch;

use cardstats_core::CardImageResolver;

use crate::theme;

#[derive(Debug, Clone, Default)]
enum PreviewState {
    #[default]
    Empty,
    Resolving {
        name: String,
    },
    Resolved {
        name: String,
        url: Option<String>,
    },
}

/// Resolves and displays the image URL for one highlighted card.
pub struct CardPreview {
    resolver: Arc<CardImageResolver>,
    current: Option<String>,
    state_tx: watch::Sender<PreviewState>,
    state_rx: watch::Receiver<PreviewState>,
    generation: Arc<AtomicU64>,
}

impl CardPreview {
    pub fn new(resolver: Arc<CardImageResolver>) -> Self {
        let (state_tx, state_rx) = watch::channel(PreviewState::Empty);
        Self {
            resolver,
            current: None,
            state_tx,
            state_rx,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Point the preview at a card name. A no-op if the name is unchanged.
    pub fn show(&mut self, name: &str) {
        if self.current.as_deref() == Some(name) {
            return;
        }
        self.current = Some(name.to_owned());

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state_tx.send_replace(PreviewState::Resolving {
            name: name.to_owned(),
        });

        let resolver = Arc::clone(&self.resolver);
        let guard = Arc::clone(&self.generation);
        let tx = self.state_tx.clone();
        let name = name.to_owned();
        tokio::spawn(async move {
            let url = resolver.resolve(&name).await;
            // The highlight may have moved on while we resolved.
            if guard.load(Ordering::SeqCst) == generation {
                tx.send_replace(PreviewState::Resolved { name, url });
            }
        });
    }

    /// Hide the preview.
    pub fn clear(&mut self) {
        self.current = None;
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state_tx.send_replace(PreviewState::Empty);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Card ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let lines = match &*self.state_rx.borrow_and_update() {
            PreviewState::Empty => vec![Line::from(Span::styled("—", theme::dim()))],
            PreviewState::Resolving { name } => vec![
                Line::from(Span::styled(name.clone(), theme::title_style())),
                Line::from(Span::styled("resolving image…", theme::dim())),
            ],
            PreviewState::Resolved {
                name,
                url: Some(url),
            } => vec![
                Line::from(Span::styled(name.clone(), theme::title_style())),
                Line::from(url.clone()),
            ],
            PreviewState::Resolved { name, url: None } => vec![
                Line::from(Span::styled(name.clone(), theme::title_style())),
                Line::from(Span::styled("no image available", theme::dim())),
            ],
        };

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}
