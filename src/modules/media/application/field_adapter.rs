//! Translation between the AniList media shape and stored records.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::modules::catalog::infrastructure::anilist::models::{
    ExternalMedia, ExternalOverview, MediaNode, MediaTitle, PersonNode, StaffConnection,
};
use crate::modules::media::application::dto::{
    CoverImageResponse, MediaOverview, MediaResponse, MediaSummary, PersonPreview, Ranking,
    Recommendation, RelatedMedia, ScoreBucket, StatusBucket, TitleResponse,
};
use crate::modules::media::application::kind_descriptor::KindDescriptor;
use crate::modules::media::domain::{
    classify, KindExtension, KindGroup, MediaKind, MediaRecord, MediaStatus, NewMediaRecord,
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::Validator;
use crate::{log_error, log_warn};

/// Staff roles credited as authors of a print work.
const AUTHOR_ROLES: [&str; 3] = ["Story", "Art", "Original"];

static LINE_BREAK: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
static MARKUP_TAG: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

#[derive(Debug, Clone, Default)]
pub struct MediaFieldAdapter;

impl MediaFieldAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Build a storage payload from an upstream entry.
    ///
    /// The kind comes from the descriptor's group: always `Anime` for the
    /// anime group, and decided by the format classifier for print.
    pub fn from_external(
        &self,
        dto: ExternalMedia,
        descriptor: &KindDescriptor,
    ) -> AppResult<NewMediaRecord> {
        let external_id = dto.id.ok_or_else(|| {
            AppError::ValidationError("Upstream media has no id".to_string())
        })?;

        let title = dto.title.unwrap_or_default();
        let title_romaji = non_blank(title.romaji);
        let title_english = non_blank(title.english);
        let title_native = non_blank(title.native);
        Validator::validate_titles([
            title_romaji.as_deref(),
            title_english.as_deref(),
            title_native.as_deref(),
        ])
        .map_err(|e| {
            AppError::ValidationError(format!("Media {}: {}", external_id, validation_message(e)))
        })?;

        let kind = match descriptor.group {
            KindGroup::Anime => MediaKind::Anime,
            KindGroup::Print => classify(dto.format.as_deref()).kind(),
        };

        let extension = match descriptor.group {
            KindGroup::Anime => KindExtension {
                episodes: dto.episodes,
                season: dto.season,
                season_year: dto.season_year,
                ..KindExtension::default()
            },
            KindGroup::Print => KindExtension {
                chapters: dto.chapters,
                volumes: dto.volumes,
                authors: extract_authors(dto.staff.as_ref()),
                ..KindExtension::default()
            },
        };

        let description = match dto.description.as_deref() {
            Some(raw) => clean_description(raw)?,
            None => None,
        };

        Ok(NewMediaRecord {
            external_id,
            mal_id: dto.id_mal,
            kind,
            title_romaji,
            title_english,
            title_native,
            status: MediaStatus::from_upstream(dto.status.as_deref()),
            cover_image: dto.cover_image.and_then(|c| c.large),
            banner_image: dto.banner_image,
            description,
            genres: dto.genres.unwrap_or_default(),
            tags: dto
                .tags
                .unwrap_or_default()
                .into_iter()
                .filter_map(|t| t.name)
                .collect(),
            score: normalize_score(dto.average_score),
            popularity: dto.popularity,
            favourites: dto.favourites,
            format: dto.format,
            extension,
            country_of_origin: dto.country_of_origin,
        })
    }

    /// Map a stored record back to the upstream-shaped response.
    ///
    /// Soft-deleted records map to `None`. A non-positive external id means
    /// the row is corrupt and is rejected.
    pub fn to_response(&self, record: &MediaRecord) -> AppResult<Option<MediaResponse>> {
        if let Err(e) = Validator::validate_external_id(record.external_id) {
            log_error!("Corrupt media record {}: {}", record.id, e);
            return Err(e);
        }
        if record.is_deleted() {
            return Ok(None);
        }

        let ext = &record.extension;
        Ok(Some(MediaResponse {
            id: record.external_id,
            id_mal: record.mal_id,
            kind: record.kind,
            media_type: record.kind.group().upstream_type().to_string(),
            format: record.format.clone(),
            status: record.status,
            title: TitleResponse {
                romaji: record.title_romaji.clone(),
                english: record.title_english.clone(),
                native: record.title_native.clone(),
            },
            description: record.description.clone(),
            cover_image: CoverImageResponse {
                large: record.cover_image.clone(),
            },
            banner_image: record.banner_image.clone(),
            average_score: record.score.map(denormalize_score),
            popularity: record.popularity,
            favourites: record.favourites,
            genres: record.genres.clone(),
            tags: record.tags.clone(),
            country_of_origin: record.country_of_origin.clone(),
            episodes: ext.episodes,
            season: ext.season.clone(),
            season_year: ext.season_year,
            chapters: ext.chapters,
            volumes: ext.volumes,
            authors: ext.authors.clone(),
            last_synced_at: record.last_synced_at,
        }))
    }

    /// Map many records, dropping soft-deleted and corrupt ones.
    pub fn to_response_list(&self, records: &[MediaRecord]) -> Vec<MediaResponse> {
        records
            .iter()
            .filter_map(|record| match self.to_response(record) {
                Ok(response) => response,
                Err(e) => {
                    log_warn!("Dropping media {} from list: {}", record.external_id, e);
                    None
                }
            })
            .collect()
    }

    /// Assemble an overview around an already-mapped base record.
    /// Preview entries without an id are skipped.
    pub fn to_overview(&self, media: MediaResponse, source: &ExternalOverview) -> MediaOverview {
        let relations = source
            .relations
            .iter()
            .flat_map(|c| c.edges.iter())
            .filter_map(|edge| {
                let media = edge.node.as_ref().and_then(summarize)?;
                Some(RelatedMedia {
                    relation_type: edge.relation_type.clone(),
                    media,
                })
            })
            .collect();

        let characters = source
            .characters
            .iter()
            .flat_map(|c| c.edges.iter())
            .filter_map(|edge| person_preview(edge.node.as_ref()?, edge.role.clone()))
            .collect();

        let staff = source
            .staff_preview
            .iter()
            .flat_map(|c| c.edges.iter())
            .filter_map(|edge| person_preview(edge.node.as_ref()?, edge.role.clone()))
            .collect();

        let (score_distribution, status_distribution) = match &source.stats {
            Some(stats) => (
                stats
                    .score_distribution
                    .iter()
                    .filter_map(|b| {
                        Some(ScoreBucket {
                            score: b.score?,
                            amount: b.amount.unwrap_or(0),
                        })
                    })
                    .collect(),
                stats
                    .status_distribution
                    .iter()
                    .filter_map(|b| {
                        Some(StatusBucket {
                            status: b.status.clone()?,
                            amount: b.amount.unwrap_or(0),
                        })
                    })
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        let rankings = source
            .rankings
            .iter()
            .flatten()
            .filter_map(|r| {
                Some(Ranking {
                    rank: r.rank?,
                    ranking_type: r.rank_type.clone(),
                    format: r.format.clone(),
                    year: r.year,
                    season: r.season.clone(),
                    all_time: r.all_time.unwrap_or(false),
                    context: r.context.clone(),
                })
            })
            .collect();

        let recommendations = source
            .recommendations
            .iter()
            .flat_map(|c| c.nodes.iter())
            .filter_map(|node| {
                let media = node.media_recommendation.as_ref().and_then(summarize)?;
                Some(Recommendation {
                    rating: node.rating.unwrap_or(0),
                    media,
                })
            })
            .collect();

        MediaOverview {
            media,
            relations,
            characters,
            staff,
            score_distribution,
            status_distribution,
            rankings,
            recommendations,
        }
    }
}

/// Upstream 0–100 score to the stored 0–10 scale. Out-of-range and
/// non-finite values are absent, never zero.
pub fn normalize_score(score: Option<f64>) -> Option<f32> {
    match score {
        Some(s) if s.is_finite() && (0.0..=100.0).contains(&s) => Some((s.round() / 10.0) as f32),
        _ => None,
    }
}

pub fn denormalize_score(score: f32) -> i32 {
    (score * 10.0).round() as i32
}

/// Reduce an upstream HTML-ish description to plain text.
pub fn clean_description(raw: &str) -> AppResult<Option<String>> {
    let line_break = pattern(&LINE_BREAK, r"(?i)<br\s*/?>")?;
    let markup_tag = pattern(&MARKUP_TAG, r"<[^>]*>")?;

    let text = line_break.replace_all(raw, "\n");
    let text = markup_tag.replace_all(&text, "");
    let text = text
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

fn pattern(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    source: &str,
) -> AppResult<&'static Regex> {
    cell.get_or_init(|| Regex::new(source))
        .as_ref()
        .map_err(|e| AppError::InternalError(format!("Invalid markup pattern: {}", e)))
}

/// Staff credited with story, art or original work, first credit wins.
fn extract_authors(staff: Option<&StaffConnection>) -> Vec<String> {
    let mut seen = HashSet::new();
    staff
        .iter()
        .flat_map(|s| s.edges.iter())
        .filter(|edge| {
            edge.role
                .as_deref()
                .is_some_and(|role| AUTHOR_ROLES.iter().any(|r| role.contains(r)))
        })
        .filter_map(|edge| edge.node.as_ref()?.name.as_ref()?.full.clone())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validation_message(err: AppError) -> String {
    match err {
        AppError::ValidationError(message) => message,
        other => other.to_string(),
    }
}

fn title_response(title: Option<&MediaTitle>) -> TitleResponse {
    title
        .map(|t| TitleResponse {
            romaji: t.romaji.clone(),
            english: t.english.clone(),
            native: t.native.clone(),
        })
        .unwrap_or_default()
}

fn summarize(node: &MediaNode) -> Option<MediaSummary> {
    Some(MediaSummary {
        id: node.id?,
        media_type: node.media_type.clone(),
        format: node.format.clone(),
        status: node.status.clone(),
        title: title_response(node.title.as_ref()),
        cover_image: node.cover_image.as_ref().and_then(|c| c.large.clone()),
    })
}

fn person_preview(node: &PersonNode, role: Option<String>) -> Option<PersonPreview> {
    Some(PersonPreview {
        id: node.id?,
        name: node.name.as_ref().and_then(|n| n.full.clone()),
        image: node.image.as_ref().and_then(|i| i.medium.clone()),
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::media::application::kind_descriptor::{ANIME, MANGA, NOVEL};
    use chrono::Utc;
    use serde_json::json;

    fn external(value: serde_json::Value) -> ExternalMedia {
        serde_json::from_value(value).unwrap()
    }

    fn bebop() -> ExternalMedia {
        external(json!({
            "id": 1,
            "idMal": 1,
            "type": "ANIME",
            "format": "TV",
            "status": "FINISHED",
            "title": { "romaji": "Cowboy Bebop", "english": "Cowboy Bebop", "native": "カウボーイビバップ" },
            "description": "In the year 2071...<br><br>Bounty hunters &amp; friends.",
            "coverImage": { "extraLarge": "xl.jpg", "large": "l.jpg", "medium": "m.jpg" },
            "averageScore": 86,
            "genres": ["Action", "Sci-Fi"],
            "tags": [ { "name": "Space", "rank": 94 }, { "name": "Bounty Hunters", "rank": 90 } ],
            "episodes": 26,
            "season": "SPRING",
            "seasonYear": 1998
        }))
    }

    #[test]
    fn test_normalize_score_bounds() {
        assert_eq!(normalize_score(Some(0.0)), Some(0.0));
        assert_eq!(normalize_score(Some(100.0)), Some(10.0));
        assert_eq!(normalize_score(Some(86.0)), Some(8.6));
        assert_eq!(normalize_score(Some(-1.0)), None);
        assert_eq!(normalize_score(Some(101.0)), None);
        assert_eq!(normalize_score(Some(f64::NAN)), None);
        assert_eq!(normalize_score(None), None);
    }

    #[test]
    fn test_normalized_scores_stay_in_range() {
        for raw in (0..=100).map(f64::from) {
            let score = normalize_score(Some(raw)).unwrap();
            assert!((0.0..=10.0).contains(&score));
            assert_eq!(denormalize_score(score), raw as i32);
        }
    }

    #[test]
    fn test_clean_description() {
        assert_eq!(
            clean_description("Line one<br>Line two<BR />Line three<br/>end").unwrap(),
            Some("Line one\nLine two\nLine three\nend".to_string())
        );
        assert_eq!(
            clean_description("<i>Quoted</i> &quot;text&quot; &lt;3 &amp; more").unwrap(),
            Some("Quoted \"text\" <3 & more".to_string())
        );
        assert_eq!(clean_description("  <br>  ").unwrap(), None);
        assert_eq!(clean_description("").unwrap(), None);
    }

    #[test]
    fn test_from_external_anime() {
        let adapter = MediaFieldAdapter::new();
        let payload = adapter.from_external(bebop(), &ANIME).unwrap();

        assert_eq!(payload.external_id, 1);
        assert_eq!(payload.kind, MediaKind::Anime);
        assert_eq!(payload.status, MediaStatus::Finished);
        assert_eq!(payload.cover_image.as_deref(), Some("l.jpg"));
        assert_eq!(payload.score, Some(8.6));
        assert_eq!(payload.tags, vec!["Space", "Bounty Hunters"]);
        assert_eq!(payload.extension.episodes, Some(26));
        assert_eq!(payload.extension.season_year, Some(1998));
        assert_eq!(payload.extension.chapters, None);
        assert_eq!(
            payload.description.as_deref(),
            Some("In the year 2071...\n\nBounty hunters & friends.")
        );
    }

    #[test]
    fn test_from_external_print_kind_follows_format() {
        let adapter = MediaFieldAdapter::new();
        let novel = external(json!({
            "id": 86300,
            "type": "MANGA",
            "format": "NOVEL",
            "status": "HIATUS",
            "title": { "romaji": "Mushoku Tensei" },
            "chapters": 286,
            "volumes": 26,
            "staff": { "edges": [
                { "role": "Story", "node": { "name": { "full": "Rifujin na Magonote" } } },
                { "role": "Illustration", "node": { "name": { "full": "Shirotaka" } } },
                { "role": "Original Story", "node": { "name": { "full": "Rifujin na Magonote" } } }
            ] }
        }));

        // the descriptor only chooses the group; the format decides the kind
        let payload = adapter.from_external(novel, &MANGA).unwrap();
        assert_eq!(payload.kind, MediaKind::Novel);
        assert_eq!(payload.status, MediaStatus::NotYetReleased);
        assert_eq!(payload.extension.chapters, Some(286));
        assert_eq!(payload.extension.authors, vec!["Rifujin na Magonote"]);
        assert_eq!(payload.extension.episodes, None);

        let one_shot = external(json!({
            "id": 5, "format": "ONE_SHOT", "title": { "english": "Short" }
        }));
        let payload = adapter.from_external(one_shot, &NOVEL).unwrap();
        assert_eq!(payload.kind, MediaKind::Manga);
    }

    #[test]
    fn test_from_external_requires_id_and_title() {
        let adapter = MediaFieldAdapter::new();

        let no_id = external(json!({ "title": { "romaji": "Nameless" } }));
        assert!(matches!(
            adapter.from_external(no_id, &ANIME),
            Err(AppError::ValidationError(_))
        ));

        let no_title = external(json!({ "id": 3, "title": { "romaji": " " } }));
        assert!(matches!(
            adapter.from_external(no_title, &ANIME),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_long_titles_are_kept_whole() {
        let adapter = MediaFieldAdapter::new();
        let long = "a".repeat(300);
        let dto = external(json!({ "id": 9, "format": "LIGHT_NOVEL", "title": { "english": long } }));

        let payload = adapter.from_external(dto, &NOVEL).unwrap();
        assert_eq!(payload.kind, MediaKind::Novel);
        assert_eq!(payload.title_english.as_deref().map(str::len), Some(300));
    }

    #[test]
    fn test_round_trip_preserves_identity_and_score() {
        let adapter = MediaFieldAdapter::new();
        let payload = adapter.from_external(bebop(), &ANIME).unwrap();
        let record = MediaRecord::create(payload, Utc::now());

        let response = adapter.to_response(&record).unwrap().unwrap();

        assert_eq!(response.id, 1);
        assert_eq!(response.kind, MediaKind::Anime);
        assert_eq!(response.media_type, "ANIME");
        assert_eq!(response.title.romaji.as_deref(), Some("Cowboy Bebop"));
        assert_eq!(response.title.english.as_deref(), Some("Cowboy Bebop"));
        assert_eq!(response.title.native.as_deref(), Some("カウボーイビバップ"));
        assert_eq!(response.average_score, Some(86));
        assert_eq!(response.cover_image.large.as_deref(), Some("l.jpg"));
    }

    #[test]
    fn test_to_response_filters_deleted_and_rejects_corrupt() {
        let adapter = MediaFieldAdapter::new();
        let payload = adapter.from_external(bebop(), &ANIME).unwrap();

        let mut deleted = MediaRecord::create(payload.clone(), Utc::now());
        deleted.deleted_at = Some(Utc::now());
        assert_eq!(adapter.to_response(&deleted).unwrap(), None);

        let mut corrupt = MediaRecord::create(payload.clone(), Utc::now());
        corrupt.external_id = 0;
        assert!(matches!(
            adapter.to_response(&corrupt),
            Err(AppError::ValidationError(_))
        ));

        let live = MediaRecord::create(payload, Utc::now());
        let list = adapter.to_response_list(&[deleted, corrupt, live]);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 1);
    }

    #[test]
    fn test_overview_skips_entries_without_ids() {
        let adapter = MediaFieldAdapter::new();
        let overview: ExternalOverview = serde_json::from_value(json!({
            "id": 1,
            "title": { "romaji": "Cowboy Bebop" },
            "relations": { "edges": [
                { "relationType": "SIDE_STORY", "node": { "id": 5, "title": { "romaji": "Tengoku no Tobira" }, "coverImage": { "large": "movie.jpg" } } },
                { "relationType": "OTHER", "node": { "title": { "romaji": "ghost" } } }
            ] },
            "characters": { "edges": [
                { "role": "MAIN", "node": { "id": 1, "name": { "full": "Spike Spiegel" }, "image": { "medium": "spike.jpg" } } }
            ] },
            "staffPreview": { "edges": [
                { "role": "Director", "node": { "id": 95, "name": { "full": "Shinichiro Watanabe" } } }
            ] },
            "stats": {
                "scoreDistribution": [ { "score": 100, "amount": 12 }, { "amount": 3 } ],
                "statusDistribution": [ { "status": "COMPLETED", "amount": 40 } ]
            },
            "rankings": [ { "rank": 28, "type": "RATED", "allTime": true, "context": "highest rated all time" } ],
            "recommendations": { "nodes": [
                { "rating": 412, "mediaRecommendation": { "id": 205, "title": { "romaji": "Samurai Champloo" } } },
                { "rating": 3, "mediaRecommendation": null }
            ] }
        }))
        .unwrap();

        let payload = adapter.from_external(overview.media.clone(), &ANIME).unwrap();
        let base = adapter
            .to_response(&MediaRecord::create(payload, Utc::now()))
            .unwrap()
            .unwrap();
        let result = adapter.to_overview(base, &overview);

        assert_eq!(result.media.id, 1);
        assert_eq!(result.relations.len(), 1);
        assert_eq!(result.relations[0].media.cover_image.as_deref(), Some("movie.jpg"));
        assert_eq!(result.characters[0].name.as_deref(), Some("Spike Spiegel"));
        assert_eq!(result.staff[0].role.as_deref(), Some("Director"));
        assert_eq!(result.score_distribution.len(), 1);
        assert_eq!(result.status_distribution[0].amount, 40);
        assert!(result.rankings[0].all_time);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].rating, 412);
    }
}
