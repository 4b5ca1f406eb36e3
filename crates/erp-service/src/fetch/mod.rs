//! Paginated, filtered and sorted list fetching.

pub mod fetcher;
pub mod state;

pub use fetcher::ListFetcher;
pub use state::FetchState;
