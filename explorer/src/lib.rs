pub mod config;
pub mod graph;
pub mod routes;
pub mod session;
pub mod source;

use session::Explorer;

pub struct AppState {
    pub explorer: Explorer,
}

impl AppState {
    pub fn new(explorer: Explorer) -> Self {
        Self { explorer }
    }
}
