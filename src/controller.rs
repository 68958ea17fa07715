//! Applies UI actions to the store and the launcher, one at a time.
//!
//! Writes go straight to the store and the affected table is re-listed
//! afterwards; the view never patches its rows locally.

use crate::error::DataAccessError;
use crate::launcher::{Launcher, ProcessRunner};
use crate::repository::Repository;
use crate::ui::{Action, App};
use tracing::{error, info};

pub async fn perform<R: ProcessRunner>(
    app: &mut App,
    repo: &mut Repository,
    launcher: &Launcher<R>,
    action: Action,
) {
    match action {
        Action::Quit => {}
        Action::RefreshNodes => reload_nodes(app, repo).await,
        Action::RefreshPods => reload_pods(app, repo).await,
        Action::RefreshAll => {
            reload_nodes(app, repo).await;
            reload_pods(app, repo).await;
        }
        Action::InsertNode(node) => match repo.insert_node(&node).await {
            Ok(()) => reload_nodes(app, repo).await,
            Err(e) => show_db_error(app, &e),
        },
        Action::DeleteNode(id) => match repo.delete_node(id).await {
            Ok(()) => reload_nodes(app, repo).await,
            Err(e) => show_db_error(app, &e),
        },
        Action::InsertPod(pod) => match repo.insert_pod(&pod).await {
            Ok(()) => reload_pods(app, repo).await,
            Err(e) => show_db_error(app, &e),
        },
        Action::DeletePod(id) => match repo.delete_pod(id).await {
            Ok(()) => reload_pods(app, repo).await,
            Err(e) => show_db_error(app, &e),
        },
        Action::Autoscale(request) => match launcher.autoscale(&request).await {
            Ok(output) => {
                info!("Autoscale of {} finished", request.deployment);
                app.show_message(output);
            }
            Err(e) => app.show_message(e.to_string()),
        },
    }
}

async fn reload_nodes(app: &mut App, repo: &mut Repository) {
    match repo.list_nodes().await {
        Ok(nodes) => app.set_nodes(nodes),
        Err(e) => show_db_error(app, &e),
    }
}

async fn reload_pods(app: &mut App, repo: &mut Repository) {
    match repo.list_pods().await {
        Ok(pods) => app.set_pods(pods),
        Err(e) => show_db_error(app, &e),
    }
}

fn show_db_error(app: &mut App, e: &DataAccessError) {
    error!("Store operation failed: {}", e);
    app.show_message(format!("DB Error: {}", e));
}
