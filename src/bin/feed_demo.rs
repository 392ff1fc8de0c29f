//! Demo that walks the core flow against the live endpoints: login,
//! fetch the feed, open the first card through the content pipeline.
//!
//! Credentials come from POOL_DEMO_USERNAME / POOL_DEMO_DOB (a .env file
//! works too).

use pool_reader::app::{AppContext, ArticleScreen, FeedScreen, LoginScreen, ScreenState};
use pool_reader::{Endpoints, LinkIntent, Route, Router};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let endpoints = Endpoints::load_default();
    let ctx = AppContext::new(&endpoints);
    let mut router = Router::new(Route::Login);

    let mut login = LoginScreen::mount();
    login.username = std::env::var("POOL_DEMO_USERNAME").unwrap_or_else(|_| "demo".into());
    login.dob = std::env::var("POOL_DEMO_DOB").unwrap_or_else(|_| "2000-01-01".into());

    if !login.submit(&ctx, &mut router).await {
        if let Some(msg) = &login.error {
            eprintln!("login rejected: {msg}");
        } else {
            eprintln!("login unreachable; check POOL_BACKEND_URL");
        }
        return;
    }

    let Some(mut feed) = FeedScreen::mount(&ctx, &mut router) else {
        eprintln!("no session after login?");
        return;
    };
    feed.load(&ctx).await;

    let Some(cards) = feed.cards.ready().cloned() else {
        println!("feed still loading (fetch absorbed); nothing to open");
        return;
    };
    println!("feed: {} cards", cards.len());

    let Some(card) = cards.first() else {
        println!("empty feed");
        return;
    };
    feed.open(&ctx, &mut router, card);

    let Route::Article(page) = router.current().clone() else {
        return;
    };
    let Some(mut reader) = ArticleScreen::mount(&ctx, &mut router, page) else {
        return;
    };
    reader.load(&ctx).await;

    match &reader.document {
        ScreenState::Ready(doc) => {
            println!(
                "loaded '{}' ({} bytes, {} anchors)",
                doc.page.display(),
                doc.body_html.len(),
                doc.region.len()
            );
            // Show how the first few links would be handled.
            for i in 0..doc.region.len().min(5) {
                let mut scratch = Router::new(router.current().clone());
                match reader.click_content(&mut scratch, i) {
                    LinkIntent::Open(page) => println!("  [{i}] in-app -> {}", page.display()),
                    LinkIntent::PassThrough(href) => println!("  [{i}] browser -> {href}"),
                    LinkIntent::Inert => println!("  [{i}] inert"),
                }
            }
        }
        ScreenState::Failed => println!("article load failed (terminal; re-navigate to retry)"),
        ScreenState::Loading => println!("article still loading"),
    }

    println!("feed-demo done");
}
