//! AniList GraphQL queries
//!
//! Documents come in two families: anime (`type: ANIME`) and print
//! (`type: MANGA`, which covers manga and novels). Print documents take
//! `$formatIn` / `$formatNotIn` so one document serves both print kinds.
//! AniList treats a null argument as absent.

macro_rules! common_fields {
    () => {
        r#"
    id
    idMal
    type
    format
    status
    title {
      romaji
      english
      native
    }
    description(asHtml: false)
    coverImage {
      extraLarge
      large
      medium
    }
    bannerImage
    averageScore
    popularity
    favourites
    genres
    tags {
      name
      rank
      isMediaSpoiler
    }
    countryOfOrigin"#
    };
}

macro_rules! anime_fields {
    () => {
        concat!(
            "fragment animeFields on Media {",
            common_fields!(),
            r#"
    episodes
    season
    seasonYear
}
"#
        )
    };
}

macro_rules! print_fields {
    () => {
        concat!(
            "fragment printFields on Media {",
            common_fields!(),
            r#"
    chapters
    volumes
    staff(perPage: 10, sort: [RELEVANCE, ID]) {
      edges {
        role
        node {
          id
          name {
            full
          }
        }
      }
    }
}
"#
        )
    };
}

macro_rules! page_info {
    () => {
        r#"
    pageInfo {
      total
      perPage
      currentPage
      lastPage
      hasNextPage
    }"#
    };
}

macro_rules! overview_fields {
    () => {
        r#"
    relations {
      edges {
        relationType
        node {
          id
          type
          format
          status
          title {
            romaji
            english
            native
          }
          coverImage {
            large
          }
        }
      }
    }
    characters(page: 1, perPage: $perPage, sort: [ROLE, RELEVANCE, ID]) {
      edges {
        role
        node {
          id
          name {
            full
          }
          image {
            medium
          }
        }
      }
    }
    staffPreview: staff(page: 1, perPage: $perPage, sort: [RELEVANCE, ID]) {
      edges {
        role
        node {
          id
          name {
            full
          }
          image {
            medium
          }
        }
      }
    }
    stats {
      scoreDistribution {
        score
        amount
      }
      statusDistribution {
        status
        amount
      }
    }
    rankings {
      id
      rank
      type
      format
      year
      season
      allTime
      context
    }
    recommendations(page: 1, perPage: $perPage, sort: [RATING_DESC, ID]) {
      nodes {
        rating
        mediaRecommendation {
          id
          type
          format
          status
          title {
            romaji
            english
            native
          }
          coverImage {
            large
          }
        }
      }
    }"#
    };
}

// Detail

/// Single anime by id
pub const ANIME_DETAIL_QUERY: &str = concat!(
    r#"
query ($id: Int) {
  Media(id: $id, type: ANIME) {
    ...animeFields
  }
}
"#,
    anime_fields!()
);

/// Single manga or novel by id
pub const PRINT_DETAIL_QUERY: &str = concat!(
    r#"
query ($id: Int, $formatIn: [MediaFormat], $formatNotIn: [MediaFormat]) {
  Media(id: $id, type: MANGA, format_in: $formatIn, format_not_in: $formatNotIn) {
    ...printFields
  }
}
"#,
    print_fields!()
);

// Batch lookup

pub const ANIME_BATCH_QUERY: &str = concat!(
    r#"
query ($ids: [Int], $perPage: Int) {
  Page(page: 1, perPage: $perPage) {"#,
    page_info!(),
    r#"
    media(id_in: $ids, type: ANIME) {
      ...animeFields
    }
  }
}
"#,
    anime_fields!()
);

pub const PRINT_BATCH_QUERY: &str = concat!(
    r#"
query ($ids: [Int], $perPage: Int, $formatIn: [MediaFormat], $formatNotIn: [MediaFormat]) {
  Page(page: 1, perPage: $perPage) {"#,
    page_info!(),
    r#"
    media(id_in: $ids, type: MANGA, format_in: $formatIn, format_not_in: $formatNotIn) {
      ...printFields
    }
  }
}
"#,
    print_fields!()
);

// Keyword search

pub const ANIME_SEARCH_QUERY: &str = concat!(
    r#"
query ($search: String, $page: Int, $perPage: Int) {
  Page(page: $page, perPage: $perPage) {"#,
    page_info!(),
    r#"
    media(search: $search, type: ANIME, sort: SEARCH_MATCH) {
      ...animeFields
    }
  }
}
"#,
    anime_fields!()
);

pub const PRINT_SEARCH_QUERY: &str = concat!(
    r#"
query ($search: String, $page: Int, $perPage: Int, $formatIn: [MediaFormat], $formatNotIn: [MediaFormat]) {
  Page(page: $page, perPage: $perPage) {"#,
    page_info!(),
    r#"
    media(search: $search, type: MANGA, sort: SEARCH_MATCH, format_in: $formatIn, format_not_in: $formatNotIn) {
      ...printFields
    }
  }
}
"#,
    print_fields!()
);

// Criteria search

pub const ANIME_CRITERIA_QUERY: &str = concat!(
    r#"
query (
  $page: Int
  $perPage: Int
  $genreIn: [String]
  $status: MediaStatus
  $formatIn: [MediaFormat]
  $season: MediaSeason
  $seasonYear: Int
  $sort: [MediaSort]
) {
  Page(page: $page, perPage: $perPage) {"#,
    page_info!(),
    r#"
    media(
      type: ANIME
      genre_in: $genreIn
      status: $status
      format_in: $formatIn
      season: $season
      seasonYear: $seasonYear
      sort: $sort
    ) {
      ...animeFields
    }
  }
}
"#,
    anime_fields!()
);

pub const PRINT_CRITERIA_QUERY: &str = concat!(
    r#"
query (
  $page: Int
  $perPage: Int
  $genreIn: [String]
  $status: MediaStatus
  $formatIn: [MediaFormat]
  $formatNotIn: [MediaFormat]
  $countryOfOrigin: CountryCode
  $sort: [MediaSort]
) {
  Page(page: $page, perPage: $perPage) {"#,
    page_info!(),
    r#"
    media(
      type: MANGA
      genre_in: $genreIn
      status: $status
      format_in: $formatIn
      format_not_in: $formatNotIn
      countryOfOrigin: $countryOfOrigin
      sort: $sort
    ) {
      ...printFields
    }
  }
}
"#,
    print_fields!()
);

// Overview

pub const ANIME_OVERVIEW_QUERY: &str = concat!(
    r#"
query ($id: Int, $perPage: Int) {
  Media(id: $id, type: ANIME) {
    ...animeFields"#,
    overview_fields!(),
    r#"
  }
}
"#,
    anime_fields!()
);

pub const PRINT_OVERVIEW_QUERY: &str = concat!(
    r#"
query ($id: Int, $perPage: Int, $formatIn: [MediaFormat], $formatNotIn: [MediaFormat]) {
  Media(id: $id, type: MANGA, format_in: $formatIn, format_not_in: $formatNotIn) {
    ...printFields"#,
    overview_fields!(),
    r#"
  }
}
"#,
    print_fields!()
);
