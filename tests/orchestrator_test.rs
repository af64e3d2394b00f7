//! Aggregated search: ordering, filtering, failure isolation and cleanup

mod common;

use common::{Fault, QUERY, RecordingObserver, ScriptedFactory, fast_config, snapshot_factory};
use kodegen_tools_shopscrape::relevance::title_matches;
use kodegen_tools_shopscrape::{Aggregator, ScrapeEvent, SearchError, Source};
use std::sync::Arc;
use std::time::Duration;

fn aggregator(
    factory: &ScriptedFactory,
    config: kodegen_tools_shopscrape::ScrapeConfig,
    observer: Arc<RecordingObserver>,
) -> Aggregator {
    Aggregator::new(Arc::new(factory.clone()), Arc::new(config)).with_observer(observer)
}

fn titles(records: &[kodegen_tools_shopscrape::ProductRecord]) -> Vec<(Source, &str)> {
    records.iter().map(|r| (r.source, r.title.as_str())).collect()
}

const EXPECTED: [(Source, &str); 5] = [
    (Source::Croma, "Apple iPhone 13 (Midnight, 128 GB)"),
    (Source::Croma, "Apple iPhone 13 Silicone Case"),
    (Source::Amazon, "Apple iPhone 13 (Starlight, 128 GB)"),
    (Source::Flipkart, "Apple iPhone 13 (Midnight, 128 GB)"),
    (Source::Flipkart, "Apple iPhone 13 (Green, 128 GB)"),
];

#[tokio::test]
async fn sequential_search_merges_in_configured_order() {
    let observer = Arc::new(RecordingObserver::default());
    let factory = ScriptedFactory::new(snapshot_factory());
    let search = aggregator(&factory, fast_config().build().unwrap(), observer.clone());

    let records = search.search(QUERY).await.unwrap();
    assert_eq!(titles(&records), EXPECTED);
    assert!(records.iter().all(|r| title_matches(&r.title, QUERY)));

    assert_eq!(factory.acquired(), 3);
    assert_eq!(factory.closed(), 3);
    assert!(observer.events().contains(&ScrapeEvent::RelevanceFiltered {
        source: Source::Amazon,
        kept: 1,
        dropped: 1,
    }));
}

#[tokio::test]
async fn concurrent_search_keeps_the_same_order() {
    let factory = ScriptedFactory::new(snapshot_factory());
    let config = fast_config().concurrent(true).build().unwrap();
    let search = aggregator(&factory, config, Arc::new(RecordingObserver::default()));

    let records = search.search(QUERY).await.unwrap();
    assert_eq!(titles(&records), EXPECTED);
    assert_eq!(factory.closed(), 3);
}

#[tokio::test]
async fn source_order_is_configuration() {
    let factory = ScriptedFactory::new(snapshot_factory());
    let config = fast_config()
        .source_order([Source::Flipkart, Source::Croma])
        .build()
        .unwrap();
    let search = aggregator(&factory, config, Arc::new(RecordingObserver::default()));

    let records = search.search(QUERY).await.unwrap();
    let sources: Vec<_> = records.iter().map(|r| r.source).collect();
    assert_eq!(
        sources,
        [Source::Flipkart, Source::Flipkart, Source::Croma, Source::Croma]
    );
    assert_eq!(factory.acquired(), 2);
}

#[tokio::test]
async fn irrelevant_query_returns_nothing() {
    let factory = ScriptedFactory::new(snapshot_factory());
    let search = aggregator(
        &factory,
        fast_config().build().unwrap(),
        Arc::new(RecordingObserver::default()),
    );

    let records = search.search("pixel 8").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn acquisition_failure_surfaces_with_partial_results() {
    let factory =
        ScriptedFactory::new(snapshot_factory()).with_fault(Source::Amazon, Fault::FailAcquire);
    let search = aggregator(
        &factory,
        fast_config().build().unwrap(),
        Arc::new(RecordingObserver::default()),
    );

    let err = search.search(QUERY).await.unwrap_err();
    assert!(!err.is_client_error());
    match &err {
        SearchError::Aggregate { failures, partial } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].source_site(), Source::Amazon);
            assert_eq!(partial.len(), 4);
            assert!(partial.iter().all(|r| r.source != Source::Amazon));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("refused to start"));

    // Both acquired sessions were released
    assert_eq!(factory.acquired(), 2);
    assert_eq!(factory.closed(), 2);
}

#[tokio::test]
async fn listing_wait_timeout_does_not_abort_the_search() {
    let pages = snapshot_factory().with_page(Source::Amazon, "<html><body></body></html>");
    let factory = ScriptedFactory::new(pages);
    let search = aggregator(
        &factory,
        fast_config().build().unwrap(),
        Arc::new(RecordingObserver::default()),
    );

    let records = search.search(QUERY).await.unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.source != Source::Amazon));
}

#[tokio::test]
async fn request_deadline_abandons_slow_sources_but_closes_them() {
    let observer = Arc::new(RecordingObserver::default());
    let factory =
        ScriptedFactory::new(snapshot_factory()).with_fault(Source::Croma, Fault::HangGoto);
    let config = fast_config()
        .navigation_timeout(Duration::from_secs(60))
        .request_timeout(Duration::from_millis(300))
        .concurrent(true)
        .build()
        .unwrap();
    let search = aggregator(&factory, config, observer.clone());

    let records = search.search(QUERY).await.unwrap();
    assert!(records.iter().all(|r| r.source != Source::Croma));
    assert_eq!(records.len(), 3);
    assert_eq!(factory.closed(), 3);
    assert_eq!(
        observer.count(|e| matches!(e, ScrapeEvent::DeadlineExceeded { source: Source::Croma })),
        1
    );
}

#[tokio::test]
async fn sequential_deadline_leaves_time_for_later_sources() {
    let observer = Arc::new(RecordingObserver::default());
    let factory =
        ScriptedFactory::new(snapshot_factory()).with_fault(Source::Croma, Fault::HangGoto);
    let config = fast_config()
        .navigation_timeout(Duration::from_secs(60))
        .request_timeout(Duration::from_millis(600))
        .build()
        .unwrap();
    let search = aggregator(&factory, config, observer.clone());

    let records = search.search(QUERY).await.unwrap();
    assert_eq!(
        titles(&records),
        EXPECTED
            .iter()
            .filter(|(source, _)| *source != Source::Croma)
            .copied()
            .collect::<Vec<_>>()
    );
    assert_eq!(factory.acquired(), 3);
    assert_eq!(factory.closed(), 3);
    assert_eq!(
        observer.count(|e| matches!(e, ScrapeEvent::DeadlineExceeded { .. })),
        1
    );
}

#[tokio::test]
async fn spent_deadline_skips_sources_without_launching() {
    let observer = Arc::new(RecordingObserver::default());
    let factory = ScriptedFactory::new(snapshot_factory());
    let config = fast_config()
        .request_timeout(Duration::from_nanos(1))
        .build()
        .unwrap();
    let search = aggregator(&factory, config, observer.clone());

    let records = search.search(QUERY).await.unwrap();
    assert!(records.is_empty());
    assert_eq!(factory.acquired(), 0);
    assert_eq!(
        observer.count(|e| matches!(e, ScrapeEvent::DeadlineExceeded { .. })),
        3
    );
}

#[tokio::test]
async fn teardown_failures_do_not_fail_the_search() {
    let observer = Arc::new(RecordingObserver::default());
    let factory =
        ScriptedFactory::new(snapshot_factory()).with_fault(Source::Flipkart, Fault::FailClose);
    let search = aggregator(&factory, fast_config().build().unwrap(), observer.clone());

    let records = search.search(QUERY).await.unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(
        observer.count(|e| matches!(e, ScrapeEvent::TeardownFailed { .. })),
        1
    );
}

#[tokio::test]
async fn empty_query_is_a_caller_error() {
    let factory = ScriptedFactory::new(snapshot_factory());
    let search = aggregator(
        &factory,
        fast_config().build().unwrap(),
        Arc::new(RecordingObserver::default()),
    );

    let err = search.search("   ").await.unwrap_err();
    assert!(matches!(err, SearchError::EmptyQuery));
    assert!(err.is_client_error());
    assert_eq!(err.to_string(), "No query provided");
    assert_eq!(factory.acquired(), 0);
}
