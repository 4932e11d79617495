pub mod anilist;

pub use anilist::HttpQueryExecutor;
