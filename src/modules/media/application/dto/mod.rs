pub mod media_overview;
pub mod media_response;
pub mod search_criteria;

pub use media_overview::{
    MediaOverview, MediaSummary, PersonPreview, Ranking, Recommendation, RelatedMedia,
    ScoreBucket, StatusBucket,
};
pub use media_response::{CoverImageResponse, MediaResponse, TitleResponse};
pub use search_criteria::{SearchCriteria, DEFAULT_SORT};
