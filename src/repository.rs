//! Data access for the `aks_nodes` and `aks_pods` tables.
//!
//! A [`Repository`] owns a single store connection for its whole lifetime.
//! Every call is one round trip; nothing is cached or batched, so callers
//! re-list after a write to see the store's current state.

use crate::config::StoreConfig;
use crate::error::{DataAccessError, DataResult};
use crate::types::{NewNode, NewPod, Node, Pod};
use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Connection, Row};
use tracing::{debug, info};

const NODE_DDL_MYSQL: &str = "CREATE TABLE IF NOT EXISTS aks_nodes (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    status VARCHAR(64) NOT NULL,
    kubelet_version VARCHAR(64) NOT NULL
)";

const POD_DDL_MYSQL: &str = "CREATE TABLE IF NOT EXISTS aks_pods (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    namespace VARCHAR(255) NOT NULL,
    status VARCHAR(64) NOT NULL
)";

const NODE_DDL_SQLITE: &str = "CREATE TABLE IF NOT EXISTS aks_nodes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    status TEXT NOT NULL,
    kubelet_version TEXT NOT NULL
)";

const POD_DDL_SQLITE: &str = "CREATE TABLE IF NOT EXISTS aks_pods (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    namespace TEXT NOT NULL,
    status TEXT NOT NULL
)";

pub struct Repository {
    conn: AnyConnection,
}

impl Repository {
    pub async fn connect(config: &StoreConfig) -> DataResult<Self> {
        sqlx::any::install_default_drivers();
        let conn = AnyConnection::connect(&config.connection_url())
            .await
            .map_err(DataAccessError::Connect)?;
        info!(
            "Connected to {} store at {}",
            conn.backend_name(),
            config.redacted_url()
        );
        Ok(Self { conn })
    }

    /// Create both tables when they are missing.
    pub async fn ensure_schema(&mut self) -> DataResult<()> {
        let (nodes, pods) = if self.conn.backend_name().eq_ignore_ascii_case("sqlite") {
            (NODE_DDL_SQLITE, POD_DDL_SQLITE)
        } else {
            (NODE_DDL_MYSQL, POD_DDL_MYSQL)
        };
        for ddl in [nodes, pods] {
            sqlx::query(ddl)
                .execute(&mut self.conn)
                .await
                .map_err(DataAccessError::Schema)?;
        }
        debug!("Schema ready");
        Ok(())
    }

    pub async fn list_nodes(&mut self) -> DataResult<Vec<Node>> {
        let rows = sqlx::query("SELECT id, name, status, kubelet_version FROM aks_nodes")
            .fetch_all(&mut self.conn)
            .await
            .map_err(DataAccessError::query("list nodes"))?;
        rows.iter()
            .map(node_from_row)
            .collect::<Result<_, _>>()
            .map_err(DataAccessError::query("decode node row"))
    }

    pub async fn list_pods(&mut self) -> DataResult<Vec<Pod>> {
        let rows = sqlx::query("SELECT id, name, namespace, status FROM aks_pods")
            .fetch_all(&mut self.conn)
            .await
            .map_err(DataAccessError::query("list pods"))?;
        rows.iter()
            .map(pod_from_row)
            .collect::<Result<_, _>>()
            .map_err(DataAccessError::query("decode pod row"))
    }

    pub async fn insert_node(&mut self, node: &NewNode) -> DataResult<()> {
        let result =
            sqlx::query("INSERT INTO aks_nodes (name, status, kubelet_version) VALUES (?, ?, ?)")
                .bind(&node.name)
                .bind(&node.status)
                .bind(&node.kubelet_version)
                .execute(&mut self.conn)
                .await
                .map_err(DataAccessError::query("insert node"))?;
        debug!("Inserted node {} (id {:?})", node.name, result.last_insert_id());
        Ok(())
    }

    pub async fn delete_node(&mut self, id: i64) -> DataResult<()> {
        let result = sqlx::query("DELETE FROM aks_nodes WHERE id = ?")
            .bind(id)
            .execute(&mut self.conn)
            .await
            .map_err(DataAccessError::query("delete node"))?;
        debug!("Deleted node {}: {} row(s)", id, result.rows_affected());
        Ok(())
    }

    pub async fn insert_pod(&mut self, pod: &NewPod) -> DataResult<()> {
        let result =
            sqlx::query("INSERT INTO aks_pods (name, namespace, status) VALUES (?, ?, ?)")
                .bind(&pod.name)
                .bind(&pod.namespace)
                .bind(&pod.status)
                .execute(&mut self.conn)
                .await
                .map_err(DataAccessError::query("insert pod"))?;
        debug!("Inserted pod {} (id {:?})", pod.name, result.last_insert_id());
        Ok(())
    }

    pub async fn delete_pod(&mut self, id: i64) -> DataResult<()> {
        let result = sqlx::query("DELETE FROM aks_pods WHERE id = ?")
            .bind(id)
            .execute(&mut self.conn)
            .await
            .map_err(DataAccessError::query("delete pod"))?;
        debug!("Deleted pod {}: {} row(s)", id, result.rows_affected());
        Ok(())
    }

    /// Release the connection. Dropping also closes it, but without a clean
    /// protocol-level goodbye.
    pub async fn close(self) -> DataResult<()> {
        self.conn
            .close()
            .await
            .map_err(DataAccessError::query("close connection"))?;
        info!("Store connection closed");
        Ok(())
    }
}

fn node_from_row(row: &AnyRow) -> Result<Node, sqlx::Error> {
    Ok(Node {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        status: row.try_get("status")?,
        kubelet_version: row.try_get("kubelet_version")?,
    })
}

fn pod_from_row(row: &AnyRow) -> Result<Pod, sqlx::Error> {
    Ok(Pod {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        namespace: row.try_get("namespace")?,
        status: row.try_get("status")?,
    })
}
