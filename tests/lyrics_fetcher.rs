// tests/lyrics_fetcher.rs

use fetchproc::exec::RealFetchBackend;
use fetchproc::lyrics::{COULD_NOT_RUN, LineCursor, LyricsFetcher, LyricsView, PLACEHOLDER};
use fetchproc::types::Outcome;
use fetchproc_test_utils::fake_backend::FakeFetchBackend;
use fetchproc_test_utils::{init_tracing, sh, spec, with_timeout};

#[tokio::test]
async fn successful_fetch_replaces_the_placeholder() {
    init_tracing();

    let backend = FakeFetchBackend::new().reply(Some(Outcome::Success(
        b"first line\n\nsecond line\n".to_vec(),
    )));
    let mut fetcher = LyricsFetcher::new(backend);
    let mut view = LyricsView::new();
    assert_eq!(view.selected_line(), Some(PLACEHOLDER));

    let outcome = fetcher
        .fetch_into(spec(&["lyrics-tool", "Artist", "Title"]), &mut view)
        .await;

    assert!(outcome.is_some_and(|o| o.is_success()));
    assert_eq!(view.lines(), &["first line", "second line"]);
    assert_eq!(view.current(), Some(0));
    assert_eq!(
        fetcher.backend().executed(),
        vec![vec!["lyrics-tool".to_string(), "Artist".into(), "Title".into()]]
    );
}

#[tokio::test]
async fn failure_text_is_shown_to_the_user() {
    init_tracing();

    let backend = FakeFetchBackend::new()
        .reply(Some(Outcome::Failure("track not found\n".to_string())));
    let mut fetcher = LyricsFetcher::new(backend);
    let mut view = LyricsView::new();

    fetcher.fetch_into(spec(&["lyrics-tool"]), &mut view).await;
    assert_eq!(view.lines(), &["track not found"]);
}

#[tokio::test]
async fn absent_outcome_is_distinguishable_from_failure() {
    init_tracing();

    let mut fetcher = LyricsFetcher::new(FakeFetchBackend::new().reply(None));
    let mut view = LyricsView::new();

    let outcome = fetcher.fetch_into(spec(&["lyrics-tool"]), &mut view).await;
    assert_eq!(outcome, None);
    assert_eq!(view.lines(), &[COULD_NOT_RUN]);
}

#[tokio::test]
async fn real_backend_runs_the_command() {
    init_tracing();

    let mut fetcher = LyricsFetcher::new(RealFetchBackend::default());
    let mut view = LyricsView::new();

    let outcome = with_timeout(fetcher.fetch_into(sh("printf 'la la\\n\\nla\\n'"), &mut view)).await;

    assert_eq!(outcome, Some(Outcome::Success(b"la la\n\nla\n".to_vec())));
    assert_eq!(view.lines(), &["la la", "la"]);
    assert_eq!(view.search_forward("LA"), Some(1));
}
