// App state for Axum server
use crate::adapter::GraphResultAdapter;

#[derive(Clone)]
pub struct AppState {
    pub adapter: GraphResultAdapter,
}
