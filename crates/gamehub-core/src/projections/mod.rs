//! Read-side projections computed from stored aggregates

mod activity;

pub use activity::{genre_histogram, project_user_activity, GenreCount, UserActivity};
