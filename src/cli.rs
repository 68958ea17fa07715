use crate::config::{LauncherConfig, StoreOverrides};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "aks-console")]
#[command(about = "Manage AKS node and pod records and trigger deployment autoscaling")]
pub struct Cli {
    /// Store settings file (properties, or YAML with a .yaml/.yml extension)
    #[arg(long, default_value = "config.properties")]
    pub config: PathBuf,

    /// Store URL, e.g. mysql://localhost:3306/ai_azure_aks (overrides mysql_url)
    #[arg(long, env = "AKS_MYSQL_URL")]
    pub mysql_url: Option<String>,

    /// Store user (overrides mysql_user)
    #[arg(long, env = "AKS_MYSQL_USER")]
    pub mysql_user: Option<String>,

    /// Store password (overrides mysql_password)
    #[arg(long, env = "AKS_MYSQL_PASSWORD", hide_env_values = true)]
    pub mysql_password: Option<String>,

    /// Interpreter used to run the autoscale script
    #[arg(long, default_value = "python")]
    pub interpreter: String,

    /// Autoscale script path
    #[arg(long, default_value = "aks_autoscaler.py")]
    pub script: PathBuf,

    /// Kill the autoscale script after this many seconds (default: wait for it to exit)
    #[arg(long, value_name = "SECS")]
    pub scale_timeout: Option<u64>,

    /// Create the aks_nodes and aks_pods tables if they are missing
    #[arg(long)]
    pub init_schema: bool,

    /// Disable the TUI and print to stdout
    #[arg(long)]
    pub no_tui: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Node records
    Nodes {
        #[command(subcommand)]
        op: NodeOp,
    },
    /// Pod records
    Pods {
        #[command(subcommand)]
        op: PodOp,
    },
    /// Run the autoscale script once and print its output
    Scale {
        deployment: String,
        namespace: String,
        /// Current CPU usage in percent
        cpu: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum NodeOp {
    List,
    Add {
        name: String,
        status: String,
        kubelet_version: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PodOp {
    List,
    Add {
        name: String,
        namespace: String,
        status: String,
    },
    Delete {
        id: i64,
    },
}

impl Cli {
    pub fn store_overrides(&self) -> StoreOverrides {
        StoreOverrides {
            url: self.mysql_url.clone(),
            user: self.mysql_user.clone(),
            password: self.mysql_password.clone(),
        }
    }

    pub fn launcher_config(&self) -> LauncherConfig {
        LauncherConfig {
            interpreter: self.interpreter.clone(),
            script: self.script.clone(),
            timeout: self.scale_timeout.map(Duration::from_secs),
        }
    }
}
