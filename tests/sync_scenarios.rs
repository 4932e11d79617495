/// End-to-end read-through scenarios against the in-memory store.
///
/// The upstream catalog is replaced by a scripted executor, so these run
/// without network or database access.
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kansho_lib::modules::catalog::QueryExecutor;
use kansho_lib::modules::media::{InMemoryMediaRepository, MediaRepository, MediaSyncService};
use kansho_lib::shared::errors::AppResult;
use kansho_lib::shared::SyncConfig;
use kansho_lib::{AppError, MediaKind, Paging, SearchCriteria, UpstreamError, UpstreamErrorKind};

struct ScriptedCatalog {
    responses: Mutex<VecDeque<AppResult<Value>>>,
    requests: Mutex<Vec<Value>>,
}

impl ScriptedCatalog {
    fn with(responses: Vec<AppResult<Value>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> Value {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl QueryExecutor for ScriptedCatalog {
    async fn execute(&self, _document: &str, variables: Value, _label: &str) -> AppResult<Value> {
        self.requests.lock().unwrap().push(variables);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::InternalError("no scripted response".to_string())))
    }
}

fn single(entry: Value) -> AppResult<Value> {
    Ok(json!({ "Media": entry }))
}

fn page(entries: Vec<Value>) -> AppResult<Value> {
    let count = entries.len();
    Ok(json!({
        "Page": {
            "pageInfo": { "total": count, "perPage": 20, "currentPage": 1, "lastPage": 1, "hasNextPage": false },
            "media": entries
        }
    }))
}

fn manga(id: i32, title: &str) -> Value {
    json!({
        "id": id,
        "idMal": id + 1,
        "type": "MANGA",
        "format": "MANGA",
        "status": "RELEASING",
        "title": { "romaji": title, "english": null, "native": null },
        "description": "Pirates<br>and <i>treasure</i> &amp; more",
        "coverImage": { "extraLarge": "xl.jpg", "large": format!("{}.jpg", id) },
        "averageScore": 88,
        "popularity": 500,
        "genres": ["Adventure"],
        "tags": [{ "name": "Pirates", "rank": 90, "isMediaSpoiler": false }],
        "countryOfOrigin": "JP",
        "chapters": 1100,
        "volumes": 107,
        "staff": { "edges": [
            { "role": "Story & Art", "node": { "id": 1, "name": { "full": "Eiichiro Oda" } } },
            { "role": "Editing", "node": { "id": 2, "name": { "full": "Someone Else" } } }
        ] }
    })
}

fn novel(id: i32, title: &str) -> Value {
    json!({
        "id": id,
        "type": "MANGA",
        "format": "NOVEL",
        "status": "FINISHED",
        "title": { "romaji": title },
        "averageScore": 74,
        "popularity": 80,
        "volumes": 23
    })
}

fn anime(id: i32, title: &str) -> Value {
    json!({
        "id": id,
        "type": "ANIME",
        "format": "TV",
        "status": "FINISHED",
        "title": { "romaji": title, "english": title },
        "averageScore": 86,
        "popularity": 900,
        "episodes": 26,
        "season": "SPRING",
        "seasonYear": 1998
    })
}

fn build(
    catalog: Arc<ScriptedCatalog>,
    config: SyncConfig,
) -> (MediaSyncService, Arc<InMemoryMediaRepository>) {
    let repository = Arc::new(InMemoryMediaRepository::new());
    let service = MediaSyncService::new(repository.clone(), catalog, config);
    (service, repository)
}

#[tokio::test]
async fn test_manga_lookup_maps_print_fields_and_persists() {
    let catalog = ScriptedCatalog::with(vec![single(manga(30013, "ONE PIECE"))]);
    let (service, repository) = build(catalog.clone(), SyncConfig::default());

    let result = service.get_by_id(MediaKind::Manga, 30013).await.unwrap();

    assert_eq!(result.kind, MediaKind::Manga);
    assert_eq!(result.media_type, "MANGA");
    assert_eq!(result.chapters, Some(1100));
    assert_eq!(result.volumes, Some(107));
    assert_eq!(result.episodes, None);
    assert_eq!(result.authors, vec!["Eiichiro Oda".to_string()]);
    assert_eq!(result.average_score, Some(88));
    assert_eq!(result.cover_image.large.as_deref(), Some("30013.jpg"));
    assert_eq!(
        result.description.as_deref(),
        Some("Pirates\nand treasure & more")
    );

    assert_eq!(catalog.request(0), json!({ "id": 30013, "formatNotIn": ["NOVEL"] }));

    let stored = repository.find_by_external_id(30013).await.unwrap().unwrap();
    assert_eq!(stored.kind, MediaKind::Manga);
    assert_eq!(stored.score, Some(8.8));
}

#[tokio::test]
async fn test_novel_request_for_manga_entry_is_not_found_and_not_stored() {
    let catalog = ScriptedCatalog::with(vec![single(manga(30013, "ONE PIECE"))]);
    let (service, repository) = build(catalog, SyncConfig::default());

    let result = service.get_by_id(MediaKind::Novel, 30013).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_upstream_not_found_surfaces_as_not_found() {
    let catalog = ScriptedCatalog::with(vec![Err(AppError::Upstream(UpstreamError::new(
        UpstreamErrorKind::Query,
        Some(404),
        "Not Found.".to_string(),
    )))]);
    let (service, repository) = build(catalog, SyncConfig::default());

    let result = service.get_by_id(MediaKind::Anime, 999_999_999).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_staleness_window_serves_second_read_locally() {
    let catalog = ScriptedCatalog::with(vec![single(anime(1, "Cowboy Bebop"))]);
    let config = SyncConfig::default().with_staleness_window(Duration::from_secs(3600));
    let (service, _) = build(catalog.clone(), config);

    let first = service.get_by_id(MediaKind::Anime, 1).await.unwrap();
    let second = service.get_by_id(MediaKind::Anime, 1).await.unwrap();

    assert_eq!(catalog.request_count(), 1);
    assert_eq!(first, second);
    assert_eq!(second.season.as_deref(), Some("SPRING"));
}

#[tokio::test]
async fn test_default_window_always_refreshes() {
    let catalog = ScriptedCatalog::with(vec![
        single(anime(1, "Cowboy Bebop")),
        single(anime(1, "Cowboy Bebop (Remastered)")),
    ]);
    let (service, repository) = build(catalog.clone(), SyncConfig::default());

    service.get_by_id(MediaKind::Anime, 1).await.unwrap();
    let refreshed = service.get_by_id(MediaKind::Anime, 1).await.unwrap();

    assert_eq!(catalog.request_count(), 2);
    assert_eq!(
        refreshed.title.romaji.as_deref(),
        Some("Cowboy Bebop (Remastered)")
    );
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_novel_search_then_local_count() {
    let catalog = ScriptedCatalog::with(vec![page(vec![
        novel(86300, "Spice and Wolf"),
        novel(86301, "Spice and Wolf: Spring Log"),
    ])]);
    let (service, _) = build(catalog.clone(), SyncConfig::default());

    let results = service
        .search(MediaKind::Novel, "spice", Paging::default())
        .await
        .unwrap();

    assert_eq!(results.items.len(), 2);
    assert!(results.items.iter().all(|m| m.kind == MediaKind::Novel));
    assert_eq!(results.page_info.total, 2);

    let vars = catalog.request(0);
    assert_eq!(vars["search"], "spice");
    assert_eq!(vars["formatIn"], json!(["NOVEL"]));

    assert_eq!(service.count_cached("SPICE").await.unwrap(), 2);
    assert_eq!(service.count_cached("wolf: spring").await.unwrap(), 1);
}

#[tokio::test]
async fn test_blank_search_lists_cache_by_popularity() {
    let catalog = ScriptedCatalog::with(vec![page(vec![
        manga(10, "Low"),
        {
            let mut popular = manga(11, "High");
            popular["popularity"] = json!(9000);
            popular
        },
    ])]);
    let (service, _) = build(catalog.clone(), SyncConfig::default());

    service
        .search(MediaKind::Manga, "seed", Paging::default())
        .await
        .unwrap();
    let listed = service
        .search(MediaKind::Manga, "   ", Paging::default())
        .await
        .unwrap();

    assert_eq!(catalog.request_count(), 1);
    let ids: Vec<i32> = listed.items.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![11, 10]);
    assert_eq!(listed.page_info.total, 2);
    assert!(!listed.page_info.has_next_page);
}

#[tokio::test]
async fn test_criteria_search_ignores_unsupported_filters() {
    let catalog = ScriptedCatalog::with(vec![page(vec![novel(5, "Overlord")])]);
    let (service, _) = build(catalog.clone(), SyncConfig::default());

    let criteria = SearchCriteria::default()
        .with_genres(vec!["Fantasy".to_string()])
        .with_season("FALL", Some(2015));
    let results = service
        .search_by_criteria(MediaKind::Novel, &criteria, Paging::new(1, 10))
        .await
        .unwrap();

    assert_eq!(results.items.len(), 1);
    let vars = catalog.request(0);
    assert_eq!(vars["genreIn"], json!(["Fantasy"]));
    assert_eq!(vars["formatIn"], json!(["NOVEL"]));
    assert!(vars.get("season").is_none());
    assert!(vars.get("seasonYear").is_none());
    assert_eq!(vars["perPage"], 10);
}

#[tokio::test]
async fn test_get_many_keeps_request_order_and_drops_unknown() {
    let catalog = ScriptedCatalog::with(vec![page(vec![
        anime(3, "Three"),
        anime(1, "One"),
    ])]);
    let (service, _) = build(catalog.clone(), SyncConfig::default());

    let results = service
        .get_many(MediaKind::Anime, &[1, 2, 3, 1, -4])
        .await
        .unwrap();

    let ids: Vec<i32> = results.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(catalog.request(0)["ids"], json!([1, 2, 3]));
}

#[tokio::test]
async fn test_covers_and_scores_are_best_effort() {
    let catalog = ScriptedCatalog::with(vec![
        page(vec![manga(7, "Berserk")]),
        Err(AppError::Upstream(UpstreamError::transport(
            "connection reset".to_string(),
        ))),
    ]);
    let config = SyncConfig::default().with_staleness_window(Duration::from_secs(600));
    let (service, _) = build(catalog.clone(), config);

    let covers = service.get_covers(MediaKind::Manga, &[7]).await;
    assert_eq!(covers.get(&7).map(String::as_str), Some("7.jpg"));

    // Fresh in cache: no upstream call.
    let scores = service.get_scores(MediaKind::Manga, &[7]).await;
    assert_eq!(scores.get(&7), Some(&8.8));
    assert_eq!(catalog.request_count(), 1);

    // Cache miss plus failing upstream yields an empty map.
    let scores = service.get_scores(MediaKind::Manga, &[8]).await;
    assert!(scores.is_empty());
}

#[tokio::test]
async fn test_overview_carries_relations_and_stores_base_record() {
    let mut entry = anime(1, "Cowboy Bebop");
    entry["relations"] = json!({ "edges": [
        { "relationType": "SIDE_STORY", "node": {
            "id": 5, "type": "ANIME", "format": "MOVIE", "status": "FINISHED",
            "title": { "romaji": "Cowboy Bebop: Tengoku no Tobira" },
            "coverImage": { "large": "5.jpg" }
        } }
    ] });
    entry["stats"] = json!({
        "scoreDistribution": [{ "score": 90, "amount": 1200 }],
        "statusDistribution": [{ "status": "COMPLETED", "amount": 5000 }]
    });
    let catalog = ScriptedCatalog::with(vec![single(entry)]);
    let (service, repository) = build(catalog.clone(), SyncConfig::default());

    let overview = service.get_overview(MediaKind::Anime, 1).await.unwrap();

    assert_eq!(overview.media.id, 1);
    assert_eq!(overview.relations.len(), 1);
    assert_eq!(overview.relations[0].relation_type.as_deref(), Some("SIDE_STORY"));
    assert_eq!(overview.relations[0].media.id, 5);
    assert_eq!(overview.score_distribution.len(), 1);
    assert_eq!(catalog.request(0)["perPage"], 6);
    assert!(repository.find_by_external_id(1).await.unwrap().is_some());
}

#[tokio::test]
async fn test_invalid_id_never_reaches_upstream() {
    let catalog = ScriptedCatalog::with(vec![]);
    let (service, _) = build(catalog.clone(), SyncConfig::default());

    let result = service.get_by_id(MediaKind::Anime, 0).await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(catalog.request_count(), 0);
}

#[tokio::test]
async fn test_blank_search_with_deserialized_zero_page_size() {
    let catalog = ScriptedCatalog::with(vec![page(vec![manga(10, "Low")])]);
    let (service, _) = build(catalog.clone(), SyncConfig::default());
    service
        .search(MediaKind::Manga, "seed", Paging::default())
        .await
        .unwrap();

    let paging: Paging = serde_json::from_value(json!({ "page": 0, "perPage": 0 })).unwrap();
    let listed = service.search(MediaKind::Manga, "", paging).await.unwrap();

    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.page_info.current_page, 1);
    assert_eq!(listed.page_info.last_page, 1);
}

#[tokio::test]
async fn test_oversized_page_is_capped_before_upstream() {
    let catalog = ScriptedCatalog::with(vec![page(vec![])]);
    let (service, _) = build(catalog.clone(), SyncConfig::default());

    let paging: Paging = serde_json::from_value(json!({ "perPage": 500 })).unwrap();
    service.search(MediaKind::Anime, "bebop", paging).await.unwrap();

    assert_eq!(catalog.request(0)["perPage"], 50);
    assert_eq!(catalog.request(0)["page"], 1);
}

#[tokio::test]
async fn test_reclassified_entry_is_not_served_under_new_kind() {
    let catalog = ScriptedCatalog::with(vec![
        single(manga(42, "Shifting Format")),
        single({
            let mut entry = manga(42, "Shifting Format");
            entry["format"] = json!("NOVEL");
            entry
        }),
    ]);
    let (service, repository) = build(catalog.clone(), SyncConfig::default());

    service.get_by_id(MediaKind::Manga, 42).await.unwrap();
    let result = service.get_by_id(MediaKind::Novel, 42).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let stored = repository.find_by_external_id(42).await.unwrap().unwrap();
    assert_eq!(stored.kind, MediaKind::Manga);
}
