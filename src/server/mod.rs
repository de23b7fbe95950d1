mod comments;
mod documents;
pub mod dto;
mod drafts;
pub mod extract;
pub mod response;
mod router;

pub use router::{AppState, ROUTE_TABLE, create_router};
