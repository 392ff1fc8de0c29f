//! # Screens
//!
//! Headless controllers for the five screens. Each composes the session
//! guard, the scroll header, the backend/engagement clients and the
//! content pipeline; rendering is the embedder's concern. Screens are
//! mounted per navigation and dropped on unmount; an unmount does not
//! abort an in-flight fetch, so every screen ignores completions that
//! arrive after it was torn down.

use std::sync::Arc;

use anyhow::Result;

use crate::backend::{Bookmark, CredentialError, FeedCard, PoolClient};
use crate::config::Endpoints;
use crate::content::{self, ArticleDocument, ContentSource, LinkIntent, WikipediaSource};
use crate::engagement::EngagementClient;
use crate::scroll::{HeaderState, ScrollHeaderController};
use crate::session::{Identity, SessionStore};
use crate::title::ArticleRef;

use super::{Route, Router};

/// Composition root handed to every screen. Session state is injected
/// here rather than looked up ambiently, which keeps screens testable.
#[derive(Clone)]
pub struct AppContext {
    pub session: SessionStore,
    pub backend: PoolClient,
    pub engagement: EngagementClient,
    pub content: Arc<dyn ContentSource>,
}

impl AppContext {
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            session: SessionStore::new(&endpoints.state_dir),
            backend: PoolClient::new(&endpoints.backend_url),
            engagement: EngagementClient::new(&endpoints.backend_url),
            content: Arc::new(WikipediaSource::new(&endpoints.wiki_api_url)),
        }
    }

    /// Swap the content source (fixtures in tests).
    pub fn with_content_source(mut self, source: Arc<dyn ContentSource>) -> Self {
        self.content = source;
        self
    }
}

/// Remote-data lifecycle of a screen. `Failed` is terminal: recovery is
/// the user re-navigating, never an automatic retry.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenState<T> {
    Loading,
    Ready(T),
    Failed,
}

impl<T> ScreenState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            ScreenState::Ready(v) => Some(v),
            _ => None,
        }
    }
}

/// Which form the login screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Login,
    Signup,
}

/// Login/signup form. The only screen that does not gate on an identity.
#[derive(Debug, Clone)]
pub struct LoginScreen {
    pub mode: FormMode,
    pub username: String,
    pub dob: String,
    /// Backend rejection text, shown verbatim. Transport noise never
    /// lands here.
    pub error: Option<String>,
}

impl LoginScreen {
    pub fn mount() -> Self {
        Self {
            mode: FormMode::Login,
            username: String::new(),
            dob: String::new(),
            error: None,
        }
    }

    pub fn set_mode(&mut self, mode: FormMode) {
        self.mode = mode;
    }

    /// Submit the active form. On success the identity is persisted and
    /// the router moves to the feed; returns whether navigation happened.
    pub async fn submit(&mut self, ctx: &AppContext, router: &mut Router) -> bool {
        self.error = None;

        let result = match self.mode {
            FormMode::Login => ctx.backend.login(&self.username, &self.dob).await,
            FormMode::Signup => ctx.backend.signup(&self.username, &self.dob).await,
        };

        match result {
            Ok(identity) => {
                if let Err(e) = ctx.session.save(&identity) {
                    tracing::warn!(error = ?e, "persisting identity failed");
                }
                router.push(Route::Feed);
                true
            }
            Err(CredentialError::Rejected(msg)) => {
                self.error = Some(msg);
                false
            }
            Err(CredentialError::Transport(e)) => {
                tracing::warn!(error = ?e, "auth transport failure");
                false
            }
        }
    }
}

/// The personalized feed.
#[derive(Debug, Clone)]
pub struct FeedScreen {
    identity: Identity,
    pub cards: ScreenState<Vec<FeedCard>>,
    pub header: ScrollHeaderController,
    mounted: bool,
}

impl FeedScreen {
    /// Guard-at-mount: redirects to login and mounts nothing when no
    /// identity is resident. No network call happens before the guard.
    pub fn mount(ctx: &AppContext, router: &mut Router) -> Option<Self> {
        let identity = ctx.session.require_or_redirect(|| router.push(Route::Login))?;
        Some(Self {
            identity,
            cards: ScreenState::Loading,
            header: ScrollHeaderController::new(),
            mounted: true,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub async fn fetch(&self, ctx: &AppContext) -> Result<Vec<FeedCard>> {
        ctx.backend.feed(self.identity.user_id).await
    }

    /// Apply a fetch outcome. A failure is absorbed: the screen keeps its
    /// loading/empty face and the user re-navigates to retry. Stale
    /// completions after unmount are dropped.
    pub fn apply(&mut self, outcome: Result<Vec<FeedCard>>) {
        if !self.mounted {
            tracing::debug!("stale feed response ignored");
            return;
        }
        match outcome {
            Ok(cards) => self.cards = ScreenState::Ready(cards),
            Err(e) => tracing::warn!(error = ?e, "feed fetch absorbed"),
        }
    }

    pub async fn load(&mut self, ctx: &AppContext) {
        let outcome = self.fetch(ctx).await;
        self.apply(outcome);
    }

    /// Open a card: emit the seen signal, then route to the reader.
    pub fn open(&self, ctx: &AppContext, router: &mut Router, card: &FeedCard) {
        ctx.engagement.mark_seen(Some(&self.identity), card.page_id);
        router.push(Route::Article(ArticleRef::from_wire(card.title.clone())));
    }

    pub fn like(&self, ctx: &AppContext, card: &FeedCard) {
        ctx.engagement.like(Some(&self.identity), card.page_id);
    }

    pub fn bookmark(&self, ctx: &AppContext, card: &FeedCard) {
        ctx.engagement.bookmark(Some(&self.identity), card.page_id);
    }

    pub fn on_scroll(&mut self, offset: f64) -> HeaderState {
        self.header.sample(offset)
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

/// The article reader.
#[derive(Debug, Clone)]
pub struct ArticleScreen {
    identity: Identity,
    pub page: ArticleRef,
    pub document: ScreenState<ArticleDocument>,
    pub header: ScrollHeaderController,
    mounted: bool,
}

impl ArticleScreen {
    pub fn mount(ctx: &AppContext, router: &mut Router, page: ArticleRef) -> Option<Self> {
        let identity = ctx.session.require_or_redirect(|| router.push(Route::Login))?;
        Some(Self {
            identity,
            page,
            document: ScreenState::Loading,
            header: ScrollHeaderController::new(),
            mounted: true,
        })
    }

    pub async fn fetch(&self, ctx: &AppContext) -> Result<ArticleDocument> {
        content::load_article(ctx.content.as_ref(), &self.page).await
    }

    /// Apply a load outcome. Unlike the list screens, a pipeline failure
    /// is surfaced: the screen lands in the terminal `Failed` state with
    /// no HTML injected. Stale completions after unmount are dropped.
    pub fn apply(&mut self, outcome: Result<ArticleDocument>) {
        if !self.mounted {
            tracing::debug!(page = self.page.wire(), "stale article load ignored");
            return;
        }
        self.document = match outcome {
            Ok(doc) => ScreenState::Ready(doc),
            Err(_) => ScreenState::Failed,
        };
    }

    pub async fn load(&mut self, ctx: &AppContext) {
        let outcome = self.fetch(ctx).await;
        self.apply(outcome);
    }

    /// Delegated click inside the content region. Internal wiki links
    /// route in-app; everything else is returned for default handling.
    pub fn click_content(&self, router: &mut Router, index: usize) -> LinkIntent {
        let intent = match &self.document {
            ScreenState::Ready(doc) => doc.region.click(index),
            _ => LinkIntent::Inert,
        };
        if let LinkIntent::Open(page) = &intent {
            router.push(Route::Article(page.clone()));
        }
        intent
    }

    fn loaded_page_id(&self) -> Option<i64> {
        self.document.ready().and_then(|doc| doc.page_id)
    }

    /// Like the open article, keyed by its numeric page id. Skipped while
    /// the id is unknown (document not loaded yet).
    pub fn like(&self, ctx: &AppContext) {
        match self.loaded_page_id() {
            Some(page_id) => ctx.engagement.like(Some(&self.identity), page_id),
            None => tracing::debug!(page = self.page.wire(), "like skipped (no page id)"),
        }
    }

    pub fn bookmark(&self, ctx: &AppContext) {
        match self.loaded_page_id() {
            Some(page_id) => ctx.engagement.bookmark(Some(&self.identity), page_id),
            None => tracing::debug!(page = self.page.wire(), "bookmark skipped (no page id)"),
        }
    }

    pub fn on_scroll(&mut self, offset: f64) -> HeaderState {
        self.header.sample(offset)
    }

    /// "View on Wikipedia" footer target.
    pub fn wikipedia_url(&self) -> String {
        self.page.canonical_url()
    }

    /// External news search for the article's subject.
    pub fn news_search_url(&self) -> String {
        self.page.news_search_url()
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

/// The saved-articles list.
#[derive(Debug, Clone)]
pub struct BookmarksScreen {
    identity: Identity,
    pub bookmarks: ScreenState<Vec<Bookmark>>,
    pub header: ScrollHeaderController,
    mounted: bool,
}

impl BookmarksScreen {
    pub fn mount(ctx: &AppContext, router: &mut Router) -> Option<Self> {
        let identity = ctx.session.require_or_redirect(|| router.push(Route::Login))?;
        Some(Self {
            identity,
            bookmarks: ScreenState::Loading,
            header: ScrollHeaderController::new(),
            mounted: true,
        })
    }

    pub async fn fetch(&self, ctx: &AppContext) -> Result<Vec<Bookmark>> {
        ctx.backend.bookmarks(self.identity.user_id).await
    }

    /// A failed list fetch degrades to the empty state.
    pub fn apply(&mut self, outcome: Result<Vec<Bookmark>>) {
        if !self.mounted {
            tracing::debug!("stale bookmarks response ignored");
            return;
        }
        match outcome {
            Ok(list) => self.bookmarks = ScreenState::Ready(list),
            Err(e) => {
                tracing::warn!(error = ?e, "bookmarks fetch absorbed");
                self.bookmarks = ScreenState::Ready(Vec::new());
            }
        }
    }

    pub async fn load(&mut self, ctx: &AppContext) {
        let outcome = self.fetch(ctx).await;
        self.apply(outcome);
    }

    pub fn open(&self, router: &mut Router, bookmark: &Bookmark) {
        router.push(Route::Article(ArticleRef::from_wire(bookmark.title.clone())));
    }

    pub fn on_scroll(&mut self, offset: f64) -> HeaderState {
        self.header.sample(offset)
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

/// Side-effect-only logout route: clear the slot, replace to login.
pub fn logout(ctx: &AppContext, router: &mut Router) {
    ctx.session.clear();
    router.replace(Route::Login);
}

/// Root redirect: feed when an identity is resident, login otherwise.
pub fn resolve_root(ctx: &AppContext, router: &mut Router) {
    let target = if ctx.session.load().is_some() {
        Route::Feed
    } else {
        Route::Login
    };
    router.push(target);
}
