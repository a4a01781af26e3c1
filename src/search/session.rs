//! Async driver for the search model
//!
//! A [`SearchSession`] runs a [`UnifiedSearchModel`] on its own task. User
//! actions arrive as commands, requests run as spawned tasks reporting back
//! over a completion channel, and the quiet-period timer is a single sleep
//! polled next to both. All model mutation happens on the session task.

use super::error::SessionClosed;
use super::models::{Completion, Dispatch, Effect, SearchEvent};
use super::orchestrator::UnifiedSearchModel;
use crate::activation::{self, LocalFileResolver, ResourceOpener};
use crate::network::RequestExecutor;
use crate::results::ResultList;
use std::future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Sleep};
use tracing::{debug, info};

#[derive(Debug)]
enum SessionCommand {
    SetSearchTerm(String),
    ResultClicked(usize),
    FetchMore(String),
    ReloadProviders,
    Shutdown,
}

/// Handle to a running search session
#[derive(Debug, Clone)]
pub struct SearchSession {
    commands: mpsc::UnboundedSender<SessionCommand>,
    results: ResultList,
    events: broadcast::Sender<SearchEvent>,
}

impl SearchSession {
    /// Start driving `model` on a new task
    pub fn spawn(
        model: UnifiedSearchModel,
        executor: Arc<dyn RequestExecutor>,
        resolver: Arc<dyn LocalFileResolver>,
        opener: Arc<dyn ResourceOpener>,
    ) -> (Self, JoinHandle<()>) {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        let session = Self {
            commands,
            results: model.results().clone(),
            events: model.event_sender(),
        };

        let driver = SessionDriver {
            model,
            executor,
            resolver,
            opener,
            commands: command_rx,
            completion_tx,
            completions: completion_rx,
            debounce: None,
        };

        (session, tokio::spawn(driver.run()))
    }

    fn send(&self, command: SessionCommand) -> Result<(), SessionClosed> {
        self.commands.send(command).map_err(|_| SessionClosed)
    }

    /// Update the query text
    pub fn set_search_term(&self, term: impl Into<String>) -> Result<(), SessionClosed> {
        self.send(SessionCommand::SetSearchTerm(term.into()))
    }

    /// Activate the row at `index`
    pub fn result_clicked(&self, index: usize) -> Result<(), SessionClosed> {
        self.send(SessionCommand::ResultClicked(index))
    }

    /// Load the next page of a provider
    pub fn fetch_more_trigger_clicked(
        &self,
        provider_id: impl Into<String>,
    ) -> Result<(), SessionClosed> {
        self.send(SessionCommand::FetchMore(provider_id.into()))
    }

    /// Rediscover providers on the next search
    pub fn reload_providers(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::ReloadProviders)
    }

    /// Stop the session task; outstanding responses are discarded
    pub fn shutdown(&self) -> Result<(), SessionClosed> {
        self.send(SessionCommand::Shutdown)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    /// Shared read handle to the result list
    pub fn results(&self) -> &ResultList {
        &self.results
    }
}

struct SessionDriver {
    model: UnifiedSearchModel,
    executor: Arc<dyn RequestExecutor>,
    resolver: Arc<dyn LocalFileResolver>,
    opener: Arc<dyn ResourceOpener>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    debounce: Option<(u64, Pin<Box<Sleep>>)>,
}

impl SessionDriver {
    async fn run(mut self) {
        debug!("Search session started");

        loop {
            let effects = tokio::select! {
                command = self.commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                Some(completion) = self.completions.recv() => self.model.on_completion(completion),
                generation = debounce_elapsed(&mut self.debounce) => {
                    self.debounce = None;
                    self.model.on_debounce_elapsed(generation)
                }
            };

            self.apply(effects);
        }

        info!("Search session stopped");
    }

    fn handle(&mut self, command: SessionCommand) -> Vec<Effect> {
        match command {
            SessionCommand::SetSearchTerm(term) => self.model.set_search_term(term),
            SessionCommand::ResultClicked(index) => self.model.result_clicked(index),
            SessionCommand::FetchMore(provider_id) => {
                self.model.fetch_more_trigger_clicked(&provider_id)
            }
            SessionCommand::ReloadProviders => {
                self.model.reload_providers();
                Vec::new()
            }
            SessionCommand::Shutdown => Vec::new(),
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ArmDebounce { generation, delay } => {
                    self.debounce = Some((generation, Box::pin(sleep(delay))));
                }
                Effect::CancelDebounce => self.debounce = None,
                Effect::Dispatch(dispatch) => self.dispatch(dispatch),
                Effect::Open(activation) => {
                    activation::perform(&activation, self.resolver.as_ref(), self.opener.as_ref())
                }
            }
        }
    }

    fn dispatch(&self, dispatch: Dispatch) {
        let executor = Arc::clone(&self.executor);
        let completions = self.completion_tx.clone();

        tokio::spawn(async move {
            let outcome = executor.execute(dispatch.request.clone()).await;
            // the session may have stopped meanwhile
            let _ = completions.send(Completion::new(&dispatch, outcome));
        });
    }
}

/// Resolves with the timer's generation once it fires; pends while unarmed
async fn debounce_elapsed(timer: &mut Option<(u64, Pin<Box<Sleep>>)>) -> u64 {
    match timer {
        Some((generation, sleep)) => {
            sleep.as_mut().await;
            *generation
        }
        None => future::pending().await,
    }
}
