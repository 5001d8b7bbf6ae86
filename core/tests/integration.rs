//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port in its own thread and runtime,
//! then drives the fetcher, the list controller and the detail controller
//! over real HTTP through `UreqTransport`. This is what catches drift
//! between the core DTOs and the served JSON.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use explorer_core::{
    Character, CharacterDetailController, CharacterFetcher,
    CharacterListController, DataFetcher, ExplorerConfig, FetchError, ImageState, ListEvent,
    ListRouter, ListSnapshot, NetworkError, Status, UreqTransport,
};

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn live_fetcher(base_url: &str) -> DataFetcher<UreqTransport> {
    DataFetcher::from_config(&ExplorerConfig {
        base_url: base_url.to_string(),
        request_timeout: Some(Duration::from_secs(5)),
        ..ExplorerConfig::default()
    })
}

#[derive(Default)]
struct RecordingRouter {
    alerts: Mutex<Vec<(String, String)>>,
    opened: Mutex<Vec<Character>>,
}

impl ListRouter for RecordingRouter {
    fn show_alert(&self, title: &str, message: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }

    fn open_detail(&self, character: &Character) {
        self.opened.lock().unwrap().push(character.clone());
    }
}

async fn wait_until(
    controller: &CharacterListController,
    predicate: impl FnMut(&ListSnapshot) -> bool,
) -> ListSnapshot {
    let mut rx = controller.subscribe();
    let snapshot = tokio::time::timeout(Duration::from_secs(10), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for snapshot")
        .expect("controller stopped");
    ListSnapshot::clone(&snapshot)
}

#[tokio::test(flavor = "multi_thread")]
async fn fetcher_pages_and_filters() {
    let base = start_server();
    let fetcher = live_fetcher(&base);

    let first = fetcher.fetch_characters(1, None, None).await.unwrap();
    assert_eq!(first.results.len(), 20);
    assert_eq!(first.info.count, Some(42));
    assert_eq!(first.info.next, Some(format!("{base}/character?page=2")));
    assert_eq!(first.results[0].name, "Rick Sanchez");
    assert_eq!(first.results[0].status, Status::Alive);

    let last = fetcher.fetch_characters(3, None, None).await.unwrap();
    assert_eq!(last.results.len(), 2);
    assert!(!last.has_next());

    let ricks = fetcher.fetch_characters(1, Some("rick"), None).await.unwrap();
    assert_eq!(ricks.results.len(), 6);

    let dead = fetcher.fetch_characters(1, None, Some(Status::Dead)).await.unwrap();
    assert_eq!(dead.results.len(), 13);
    assert!(dead.results.iter().all(|c| c.status == Status::Dead));

    let unknown_mortys = fetcher
        .fetch_characters(1, Some(" Morty "), Some(Status::Unknown))
        .await
        .unwrap();
    let names: Vec<_> = unknown_mortys.results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alien Morty", "Aqua Morty", "Big Head Morty"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn fetcher_surfaces_not_found() {
    let base = start_server();
    let fetcher = live_fetcher(&base);

    let err = fetcher.fetch_characters(4, None, None).await.unwrap_err();
    assert!(
        matches!(err, FetchError::Network(NetworkError::BadStatusCode(404))),
        "{err:?}"
    );

    let err = fetcher
        .fetch_characters(1, Some("Zeep Xanflorp"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Network(NetworkError::BadStatusCode(404))));
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let fetcher = live_fetcher(&format!("http://{addr}"));

    let err = fetcher.fetch_characters(1, None, None).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn controller_browses_live_api() {
    let base = start_server();
    let router = Arc::new(RecordingRouter::default());
    let config = ExplorerConfig {
        base_url: base.clone(),
        search_debounce: Duration::from_millis(20),
        request_timeout: Some(Duration::from_secs(5)),
    };
    let controller = CharacterListController::spawn(
        Arc::new(DataFetcher::from_config(&config)),
        router.clone(),
        &config,
    );

    controller.send(ListEvent::Activated);
    wait_until(&controller, |s| s.items.len() == 20 && !s.is_loading).await;

    controller.send(ListEvent::RowDisplayed(19));
    wait_until(&controller, |s| s.items.len() == 40 && !s.is_loading).await;

    controller.send(ListEvent::RowDisplayed(39));
    let snapshot = wait_until(&controller, |s| s.items.len() == 42 && !s.is_loading).await;
    assert!(!snapshot.has_more);
    assert_eq!(snapshot.current_page, 4);
    assert_eq!(snapshot.items[41].name, "Black Rick");

    controller.send(ListEvent::FilterChanged(Some(Status::Dead)));
    let snapshot = wait_until(&controller, |s| {
        s.status_filter == Some(Status::Dead) && !s.is_loading && !s.items.is_empty()
    })
    .await;
    assert_eq!(snapshot.items.len(), 13);

    for text in ["m", "mo", "morty"] {
        controller.send(ListEvent::SearchTextChanged(text.to_string()));
    }
    let snapshot = wait_until(&controller, |s| {
        s.search_query == "morty" && !s.is_loading && !s.items.is_empty()
    })
    .await;
    let names: Vec<_> = snapshot.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Big Morty"]);

    controller.send(ListEvent::CharacterSelected(snapshot.items[0].id));
    controller.send(ListEvent::SearchTextChanged("Zeep Xanflorp".to_string()));
    for _ in 0..500 {
        if !router.alerts.lock().unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(
        *router.alerts.lock().unwrap(),
        vec![(
            "Network error".to_string(),
            "Bad Status Code Error with code: 404.".to_string()
        )]
    );
    let opened = router.opened.lock().unwrap();
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].name, "Big Morty");
}

#[tokio::test(flavor = "multi_thread")]
async fn detail_loads_portrait_from_live_api() {
    let base = start_server();
    let fetcher = live_fetcher(&base);
    let page = fetcher.fetch_characters(1, Some("Summer"), None).await.unwrap();
    let summer = page.results.into_iter().next().unwrap();

    let detail = CharacterDetailController::new(summer);
    assert_eq!(detail.item().name, "Summer Smith");
    assert_eq!(detail.item().location, "Citadel of Ricks");
    assert_eq!(detail.item().episodes.first().map(String::as_str), Some("Episode 1"));

    let bytes = detail.load_image(fetcher.transport()).await.unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(detail.image_state(), ImageState::Loaded(bytes));

    let mut ghost = detail.character().clone();
    ghost.image = format!("{base}/character/avatar/999.jpeg");
    let ghost = CharacterDetailController::new(ghost);
    let err = ghost.load_image(fetcher.transport()).await.unwrap_err();
    assert_eq!(err, explorer_core::ImageError::BadStatusCode(404));
    assert!(matches!(ghost.image_state(), ImageState::Failed(_)));
}
