use crate::api::routes;
use crate::config::Shared;
use crate::solver::DynSolver;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

#[derive(Clone)]
pub(super) struct AppState {
    pub group_name: Arc<str>,
    pub solvers: Arc<HashMap<String, DynSolver>>,
}

impl AppState {
    pub(super) fn new(group_name: &str, solvers: Vec<DynSolver>) -> Self {
        let solvers = solvers
            .into_iter()
            .map(|solver| (solver.name().to_string(), solver))
            .collect();
        Self {
            group_name: Arc::from(group_name),
            solvers: Arc::new(solvers),
        }
    }
}

/// Bind the configured API address and serve challenge requests for `solvers` under
/// `group_name` until `shutdown` resolves.
///
/// # Errors
///
/// Returns a [`hyper::Error`] if the API address can't be bound.
pub fn new(
    config: &Shared,
    group_name: &str,
    solvers: Vec<DynSolver>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> hyper::Result<impl Future<Output = hyper::Result<()>>> {
    Ok(axum::Server::try_bind(&config.api_bind_addr)?
        .serve(routes::new(AppState::new(group_name, solvers)).into_make_service())
        .with_graceful_shutdown(shutdown))
}
