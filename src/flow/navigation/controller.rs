// SPDX-License-Identifier: MIT

//! Session controller

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::state::{NavState, Transition};
use super::view::PageView;
use crate::flow::advance::should_auto_advance;
use crate::flow::document::{Block, Document, Page};
use crate::flow::rules;
use crate::flow::state::{Values, Variables};
use crate::flow::store::{DebouncedStore, MemoryValueStore};
use crate::flow::template;
use crate::flow::validate::{validate, ErrorMap};
use crate::kit::config::RuntimeConfig;
use crate::kit::error::Result;
use crate::kit::observer::{NoopObserver, PageCompletion, PageRef, SessionObserver};
use crate::kit::sink::{Answer, Submission, SubmissionSink};
use crate::kit::store::ValueStore;

/// Configures and starts a [`Session`]
pub struct SessionBuilder {
    document: Arc<Document>,
    observer: Arc<dyn SessionObserver>,
    sink: Option<Arc<dyn SubmissionSink>>,
    store: Arc<dyn ValueStore>,
    debounce: Duration,
    session_id: Option<Uuid>,
    values: Values,
}

impl SessionBuilder {
    pub fn new(document: impl Into<Arc<Document>>) -> Self {
        let defaults = RuntimeConfig::default();
        Self {
            document: document.into(),
            observer: Arc::new(NoopObserver),
            sink: None,
            store: Arc::new(MemoryValueStore::new()),
            debounce: defaults.debounce,
            session_id: None,
            values: Values::new(),
        }
    }

    /// Take the value store, submission sink and debounce window from config
    pub fn with_config(mut self, config: &RuntimeConfig) -> Result<Self> {
        self.store = config.value_store();
        self.sink = config.submission_sink()?;
        self.debounce = config.debounce;
        Ok(self)
    }

    pub fn observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn sink(mut self, sink: Arc<dyn SubmissionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn store(mut self, store: Arc<dyn ValueStore>) -> Self {
        self.store = store;
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn session_id(mut self, id: Uuid) -> Self {
        self.session_id = Some(id);
        self
    }

    /// Answers to start from; these win over cached ones
    pub fn values(mut self, values: Values) -> Self {
        self.values = values;
        self
    }

    /// Start the session on the first page, rehydrating cached answers
    pub async fn start(self) -> Session {
        let cache = DebouncedStore::new(self.store, self.debounce);
        let cache_key = self.document.cache_key();
        let mut values = cache.load(&cache_key).await;
        values.extend(self.values);

        let session_id = self.session_id.unwrap_or_else(Uuid::new_v4);
        log::info!(
            "Starting session {} for {} {} ({} pages)",
            session_id,
            self.document.kind,
            self.document.id,
            self.document.page_count()
        );

        Session {
            inner: Mutex::new(Inner {
                state: NavState::Active { index: 0 },
                index: 0,
                values,
                variables: self.document.variables.clone(),
                hidden: HashSet::new(),
                errors: None,
                history: Vec::new(),
                pending: Vec::new(),
            }),
            document: self.document,
            session_id,
            observer: self.observer,
            sink: self.sink,
            cache,
            cache_key,
        }
    }
}

/// One user's run through a document.
///
/// Methods take `&self`; share a session behind an `Arc` to drive it from
/// several tasks. A `next()` that arrives while another transition is in
/// flight is ignored.
pub struct Session {
    document: Arc<Document>,
    session_id: Uuid,
    observer: Arc<dyn SessionObserver>,
    sink: Option<Arc<dyn SubmissionSink>>,
    cache: DebouncedStore,
    cache_key: String,
    inner: Mutex<Inner>,
}

struct Inner {
    state: NavState,
    index: usize,
    values: Values,
    variables: Variables,
    hidden: HashSet<String>,
    errors: Option<ErrorMap>,
    history: Vec<Snapshot>,
    pending: Vec<JoinHandle<()>>,
}

/// State in force on a page when the user left it
struct Snapshot {
    index: usize,
    variables: Variables,
    hidden: HashSet<String>,
}

/// Everything `next()` decided while holding the lock
struct Departure {
    completion: Option<PageCompletion>,
    next_index: usize,
    redirect: Option<String>,
}

impl Session {
    pub fn builder(document: impl Into<Arc<Document>>) -> SessionBuilder {
        SessionBuilder::new(document)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub async fn state(&self) -> NavState {
        self.inner.lock().await.state.clone()
    }

    /// Index of the page being shown (or being left)
    pub async fn current_index(&self) -> usize {
        self.inner.lock().await.index
    }

    pub async fn values(&self) -> Values {
        self.inner.lock().await.values.clone()
    }

    pub async fn variables(&self) -> Variables {
        self.inner.lock().await.variables.clone()
    }

    pub async fn hidden_blocks(&self) -> HashSet<String> {
        self.inner.lock().await.hidden.clone()
    }

    /// The active page, ready to render. `None` once the session ended.
    pub async fn current_view(&self) -> Option<PageView> {
        let inner = self.inner.lock().await;
        if inner.state.is_terminal() {
            return None;
        }
        let page = self.document.pages.get(inner.index)?;
        let visible = visible_blocks(page, &inner.hidden);
        let page_count = self.document.page_count().max(1);

        Some(PageView {
            page: page_ref(page, inner.index),
            blocks: template::resolve(&visible, &inner.values, &inner.variables),
            button_text: template::resolve_str(
                &page.properties.button_text,
                &inner.values,
                &inner.variables,
            ),
            errors: inner.errors.clone(),
            progress: inner.index as f64 / page_count as f64,
        })
    }

    /// Record one answer. Runs `next()` straight away when the answered
    /// block is on the active page and its visible blocks call for
    /// auto-advance. Answers to blocks elsewhere are recorded only.
    pub async fn set_value(&self, block_id: &str, value: serde_json::Value) -> Option<Transition> {
        let auto_advance = {
            let mut inner = self.inner.lock().await;
            let NavState::Active { index } = inner.state else {
                return None;
            };
            inner.values.insert(block_id.to_string(), value);
            self.cache.schedule(&self.cache_key, inner.values.clone());

            let visible = self
                .document
                .pages
                .get(index)
                .map(|page| visible_blocks(page, &inner.hidden))
                .unwrap_or_default();
            if !visible.iter().any(|b| b.id == block_id) {
                log::debug!("Answer to {} is not on page {}, not advancing", block_id, index);
                return None;
            }
            should_auto_advance(&visible)
        };

        if auto_advance {
            log::debug!("Auto-advancing after answer to {}", block_id);
            Some(self.next(Values::new()).await)
        } else {
            None
        }
    }

    /// Try to leave the current page with the given answers merged in
    pub async fn next(&self, submitted: Values) -> Transition {
        let departure = {
            let mut inner = self.inner.lock().await;
            let NavState::Active { index } = inner.state else {
                log::debug!("Ignoring next() while {:?}", inner.state);
                return Transition::Ignored;
            };
            inner.values.extend(submitted);

            match self.depart(&mut inner, index) {
                Ok(departure) => departure,
                Err(errors) => {
                    log::debug!("Page {} failed validation: {:?}", index, errors);
                    inner.errors = Some(errors.clone());
                    return Transition::Invalid(errors);
                }
            }
        };

        if let Some(completion) = &departure.completion {
            self.observer.on_page_complete(completion);
            self.submit(completion).await;
        }

        if let Some(url) = departure.redirect {
            self.set_state(NavState::Redirecting { url: url.clone() }).await;
            self.finish(Some(&url)).await;
            return Transition::Redirected(url);
        }

        if departure.next_index >= self.document.page_count() {
            self.set_state(NavState::Completed).await;
            self.finish(None).await;
            return Transition::Completed;
        }

        let page = page_ref(&self.document.pages[departure.next_index], departure.next_index);
        {
            let mut inner = self.inner.lock().await;
            inner.index = departure.next_index;
            inner.state = NavState::Active {
                index: departure.next_index,
            };
            self.cache.schedule(&self.cache_key, inner.values.clone());
        }
        self.observer.on_page_change(&page);
        Transition::Moved(page)
    }

    /// Return to the page the user came from, restoring the variables and
    /// hidden blocks that were in force there
    pub async fn previous(&self) -> Transition {
        let page = {
            let mut inner = self.inner.lock().await;
            if !inner.state.is_active() {
                return Transition::Ignored;
            }
            let Some(snapshot) = inner.history.pop() else {
                return Transition::Ignored;
            };
            log::debug!("Going back from page {} to {}", inner.index, snapshot.index);
            inner.index = snapshot.index;
            inner.variables = snapshot.variables;
            inner.hidden = snapshot.hidden;
            inner.errors = None;
            inner.state = NavState::Active {
                index: snapshot.index,
            };
            match self.document.pages.get(snapshot.index) {
                Some(page) => page_ref(page, snapshot.index),
                None => return Transition::Ignored,
            }
        };
        self.observer.on_page_change(&page);
        Transition::Moved(page)
    }

    /// Validate, run the rule, and commit the rule's effects. Leaves the
    /// session in `Transitioning` on success.
    fn depart(&self, inner: &mut Inner, index: usize) -> std::result::Result<Departure, ErrorMap> {
        let page = self.document.pages.get(index);
        let visible = page
            .map(|p| visible_blocks(p, &inner.hidden))
            .unwrap_or_default();

        if let Some(errors) = validate(&visible, &inner.values) {
            return Err(errors);
        }
        inner.errors = None;

        let mut next_index = index + 1;
        let outcome = page
            .and_then(|p| self.document.rule_for(&p.id))
            .map(|rule| rules::evaluate(rule, &inner.values, &inner.variables))
            .unwrap_or_else(|| rules::RuleOutcome {
                variables: inner.variables.clone(),
                ..Default::default()
            });

        if let Some(target) = &outcome.next_page_id {
            match self.document.page_index(target) {
                Some(target_index) => next_index = target_index,
                None => log::warn!(
                    "Jump target '{}' not found, continuing to page {}",
                    target,
                    next_index
                ),
            }
        }

        let previous_variables = std::mem::replace(&mut inner.variables, outcome.variables);
        let previous_hidden = std::mem::replace(&mut inner.hidden, outcome.hidden_block_ids);
        inner.history.push(Snapshot {
            index,
            variables: previous_variables,
            hidden: previous_hidden,
        });
        inner.state = NavState::Transitioning { from: index };
        log::debug!("Leaving page {} for page {}", index, next_index);

        Ok(Departure {
            completion: page.map(|p| PageCompletion {
                page: page_ref(p, index),
                values: page_answers(&visible, &inner.values),
            }),
            next_index,
            redirect: page.and_then(Page::redirect_url).map(str::to_string),
        })
    }

    /// Hand a page's answers to the sink without waiting for delivery
    async fn submit(&self, completion: &PageCompletion) {
        let Some(sink) = self.sink.clone() else {
            return;
        };
        if completion.values.is_empty() {
            return;
        }

        let submission = Submission {
            document_id: self.document.id.clone(),
            session_id: self.session_id,
            answers: completion
                .values
                .iter()
                .map(|(block_id, value)| Answer {
                    block_id: block_id.clone(),
                    value: value.clone(),
                })
                .collect(),
            submitted_at: chrono::Utc::now(),
        };
        let handle = tokio::spawn(async move {
            if let Err(e) = sink.submit(&submission).await {
                log::warn!("Submission via {} failed: {}", sink.name(), e);
            }
        });
        let mut inner = self.inner.lock().await;
        inner.pending.retain(|h| !h.is_finished());
        inner.pending.push(handle);
    }

    /// Terminal bookkeeping: wait for submissions, notify, drop the cache
    async fn finish(&self, redirect: Option<&str>) {
        let (pending, values) = {
            let mut inner = self.inner.lock().await;
            (std::mem::take(&mut inner.pending), inner.values.clone())
        };
        join_all(pending).await;

        log::info!(
            "Session {} finished{}",
            self.session_id,
            redirect
                .map(|url| format!(", redirecting to {}", url))
                .unwrap_or_default()
        );
        if let Err(e) = self.observer.on_complete(&values, redirect).await {
            log::warn!("Completion callback failed: {}", e);
        }
        self.cache.clear(&self.cache_key).await;
    }

    async fn set_state(&self, state: NavState) {
        self.inner.lock().await.state = state;
    }
}

fn page_ref(page: &Page, index: usize) -> PageRef {
    PageRef {
        id: page.id.clone(),
        index,
        name: page.name.clone(),
    }
}

fn visible_blocks(page: &Page, hidden: &HashSet<String>) -> Vec<Block> {
    page.blocks
        .iter()
        .filter(|b| !hidden.contains(&b.id))
        .cloned()
        .collect()
}

/// Answers recorded for the given blocks
fn page_answers(blocks: &[Block], values: &Values) -> Values {
    blocks
        .iter()
        .filter_map(|b| values.get(&b.id).map(|v| (b.id.clone(), v.clone())))
        .collect()
}
