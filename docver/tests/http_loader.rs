use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{Router, http::StatusCode, routing::get};
use docver::{
    Config, Document, HttpSource, LoadOutcome, ManifestError, Page, ReadyState, ViewKind, load,
};

const MANIFEST: &str = r#"{"stable": "0.3.0", "dev": ["latest"], "released": ["0.3.0", "0.2.3"]}"#;

async fn serve(router: Router) -> String {
    let _ = env_logger::builder().is_test(true).try_init();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/docs")
}

fn counting(status: StatusCode, body: &'static str) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let router = Router::new().route(
        "/docs/versions.json",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                (status, body)
            }
        }),
    );
    (router, hits)
}

#[tokio::test]
async fn renders_fetched_manifest() {
    let (router, hits) = counting(StatusCode::OK, MANIFEST);
    let base = serve(router).await;
    let config = Config::new("0.2.3", &base);
    let page = Page::loaded(Document::rtd_skeleton());

    let outcome = load(&config, &HttpSource::new().unwrap(), &page)
        .await
        .unwrap();

    let report = match outcome {
        LoadOutcome::Rendered(report) => report,
        other => panic!("expected manifest to render, got {other:?}"),
    };
    assert_eq!(report.entries, 3);
    assert_eq!(report.view, ViewKind::Outdated);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(page.html().contains(&format!("href=\"{base}/en/v0.2.3\"")));
}

#[tokio::test]
async fn not_found_leaves_page_untouched() {
    let (router, hits) = counting(StatusCode::NOT_FOUND, "not found");
    let base = serve(router).await;
    let page = Page::loaded(Document::rtd_skeleton());
    let before = page.html();

    let outcome = load(
        &Config::new("latest", &base),
        &HttpSource::new().unwrap(),
        &page,
    )
    .await
    .unwrap();

    match outcome {
        LoadOutcome::Skipped(err @ ManifestError::Fetch { status: 404 }) => {
            assert_eq!(err.to_string(), "Failed to fetch versions.json manifest");
        }
        other => panic!("expected fetch failure, got {other:?}"),
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(page.html(), before);
}

#[tokio::test]
async fn malformed_manifest_is_skipped() {
    let (router, _) = counting(StatusCode::OK, "<html>oops</html>");
    let base = serve(router).await;
    let page = Page::loaded(Document::rtd_skeleton());
    let before = page.html();

    let outcome = load(
        &Config::new("latest", &base),
        &HttpSource::new().unwrap(),
        &page,
    )
    .await
    .unwrap();

    assert!(matches!(outcome, LoadOutcome::Skipped(ref e) if e.is_parse()));
    assert_eq!(page.html(), before);
}

#[tokio::test]
async fn unreachable_server_is_skipped() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let page = Page::loaded(Document::rtd_skeleton());
    let outcome = load(
        &Config::new("latest", format!("http://{addr}")),
        &HttpSource::new().unwrap(),
        &page,
    )
    .await
    .unwrap();

    assert!(matches!(
        outcome,
        LoadOutcome::Skipped(ManifestError::Transport { .. })
    ));
}

#[tokio::test]
async fn rendering_waits_for_load_event() {
    let (router, _) = counting(StatusCode::OK, MANIFEST);
    let base = serve(router).await;
    let page = Page::new(Document::rtd_skeleton(), ReadyState::Loading);
    let before = page.html();

    let task = {
        let page = page.clone();
        let config = Config::new("latest", &base);
        tokio::spawn(async move {
            load(&config, &HttpSource::new().unwrap(), &page)
                .await
                .unwrap()
        })
    };

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(!task.is_finished());
    assert_eq!(page.html(), before);

    page.finish_loading();
    let outcome = task.await.unwrap();
    assert!(outcome.is_rendered());
    assert!(page.html().contains("version-banner dev"));
}
