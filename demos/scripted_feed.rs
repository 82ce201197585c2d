//! Scripted Feed: Drives a session against canned pages and a scripted channel.
//!
//! Loads the first page, scrolls to the tail to pull older posts, then
//! replays a few realtime deliveries while printing the visible lines.
//!
//! Run with `RUST_LOG=debug` for the engine's own tracing.

use liveblog::{
    AssetLoader, MemoryBackend, RecordingRuntime, Session, SessionConfig, TextDocument, Update, Viewport,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const FEED: &str = "/liveblog/1/posts";

fn print_view(title: &str, session: &Session<TextDocument, RecordingRuntime>) {
    println!("--- {title} ---");
    for line in session.document().visible_lines() {
        println!("  | {line}");
    }
    println!();
}

fn settle(session: &mut Session<TextDocument, RecordingRuntime>) {
    while let Some(update) = session.wait(Duration::from_millis(200)) {
        match update {
            Ok(Update::Ignored) => {}
            Ok(update) => println!("update: {update:?}"),
            Err(err) => println!("error:  {err}"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Liveblog Scripted Feed");
    println!("======================");
    println!();

    let backend = Arc::new(MemoryBackend::new());
    backend.respond(
        FEED,
        json!({
            "content": [
                { "id": 5, "created": 1_700_000_500, "content": "Kick-off! The home side start strongly." },
                { "id": 4, "created": 1_700_000_400, "content": "Teams are out on the pitch." },
                { "id": 3, "created": 1_700_000_300, "content": "Line-ups confirmed, no surprises." },
            ],
            "libraries": { "liveblog/post": { "css/post.css": "css/post.css" } },
        })
        .to_string(),
    );
    backend.respond(
        "/liveblog/1/posts/1700000300",
        json!({
            "content": [
                { "id": 2, "created": "1700000200", "content": "Stadium is filling up." },
                { "id": 1, "created": "1700000100", "content": "Welcome to our live coverage." },
            ]
        })
        .to_string(),
    );
    backend.respond("/liveblog/1/posts/1700000100", r#"{"content": []}"#);

    let config = SessionConfig::from_json(
        &json!({
            "getURL": FEED,
            "getNextURL": "/liveblog/1/posts/%s",
            "channel": SessionConfig::channel_for(1),
            "debug_transport": true,
        })
        .to_string(),
    )?;

    let (transport, publisher) = liveblog::QueueTransport::new();
    let mut session = Session::start(
        config,
        backend.clone(),
        Some(Box::new(transport)),
        TextDocument::new(Viewport::new(320, 160)),
        AssetLoader::new(RecordingRuntime::new()),
    )?;
    let listener = session.listener();

    settle(&mut session);
    print_view("first page", &session);

    // Read to the end of history.
    for _ in 0..10 {
        if session.cursor().exhausted() {
            break;
        }
        session.document_mut().scroll_to_bottom();
        listener.scrolled();
        settle(&mut session);
    }
    print_view("after scrolling to the end", &session);

    // Stay at the tail while the desk publishes.
    publisher.publish(
        "add",
        json!({ "id": 6, "created": 1_700_000_600, "content": "GOAL! 1-0 after a corner." }),
    );
    publisher.publish(
        "edit",
        json!({ "id": 5, "created": 1_700_000_500, "content": "Kick-off! The visitors start strongly." }),
    );
    publisher.publish(
        "add",
        json!({ "id": 6, "created": 1_700_000_600, "content": "GOAL! 1-0 after a corner." }),
    );
    settle(&mut session);
    print_view("after realtime updates (view anchored at the bottom)", &session);

    println!("posts in stream: {}", session.stream().len());
    println!("requests made:   {:?}", backend.requests());
    println!("libraries:       {:?}", session.assets().runtime().loaded);

    session.shutdown();
    println!("listener attached after shutdown: {}", listener.is_attached());
    Ok(())
}
