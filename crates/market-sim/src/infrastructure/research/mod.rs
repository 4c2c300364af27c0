mod synthetic;

pub use synthetic::SyntheticResearchFeed;
