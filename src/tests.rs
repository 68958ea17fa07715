#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command, NodeOp, PodOp};
    use crate::utils::{self, StatusTone};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["aks-console"]).unwrap();
        assert_eq!(cli.config.to_str(), Some("config.properties"));
        assert!(cli.command.is_none());
        assert!(!cli.init_schema);

        let launcher = cli.launcher_config();
        assert_eq!(launcher.interpreter, "python");
        assert_eq!(launcher.script.to_str(), Some("aks_autoscaler.py"));
        assert_eq!(launcher.timeout, None);
    }

    #[test]
    fn test_cli_parsing_store_overrides() {
        let args = [
            "aks-console",
            "--mysql-url",
            "mysql://db:3306/aks",
            "--mysql-user",
            "root",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let overrides = cli.store_overrides();
        assert_eq!(overrides.url.as_deref(), Some("mysql://db:3306/aks"));
        assert_eq!(overrides.user.as_deref(), Some("root"));
    }

    #[test]
    fn test_cli_parsing_scale_timeout() {
        let cli = Cli::try_parse_from(["aks-console", "--scale-timeout", "30"]).unwrap();
        assert_eq!(cli.launcher_config().timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_cli_parsing_nodes_add() {
        let args = ["aks-console", "nodes", "add", "aks-pool-0", "Ready", "v1.29.2"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Nodes {
                op: NodeOp::Add {
                    name: "aks-pool-0".to_string(),
                    status: "Ready".to_string(),
                    kubelet_version: "v1.29.2".to_string(),
                }
            })
        );
    }

    #[test]
    fn test_cli_parsing_pods_delete() {
        let cli = Cli::try_parse_from(["aks-console", "pods", "delete", "17"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Pods {
                op: PodOp::Delete { id: 17 }
            })
        );
        assert!(Cli::try_parse_from(["aks-console", "pods", "delete", "x"]).is_err());
    }

    #[test]
    fn test_cli_scale_keeps_raw_cpu() {
        let args = ["aks-console", "scale", "frontend", "default", "abc"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Scale {
                deployment: "frontend".to_string(),
                namespace: "default".to_string(),
                cpu: "abc".to_string(),
            })
        );
    }

    #[test]
    fn test_cli_parsing_verbose() {
        let cli = Cli::try_parse_from(["aks-console", "-v", "--no-tui"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.no_tui);
    }

    #[test]
    fn test_status_tone() {
        assert_eq!(utils::status_tone("Ready"), StatusTone::Good);
        assert_eq!(utils::status_tone(" running "), StatusTone::Good);
        assert_eq!(utils::status_tone("Pending"), StatusTone::Pending);
        assert_eq!(utils::status_tone("CrashLoopBackOff"), StatusTone::Bad);
        assert_eq!(utils::status_tone("Draining"), StatusTone::Unknown);
    }

    #[test]
    fn test_get_color_is_stable() {
        assert_eq!(utils::get_color("kube-system"), utils::get_color("kube-system"));
    }

    #[test]
    fn test_format_table() {
        let rows = vec![
            vec!["1".to_string(), "aks-pool-0".to_string(), "Ready".to_string()],
            vec!["12".to_string(), "b".to_string(), "NotReady".to_string()],
        ];
        let out = utils::format_table(&["ID", "NAME", "STATUS"], &rows);
        assert_eq!(
            out,
            "ID  NAME        STATUS\n1   aks-pool-0  Ready\n12  b           NotReady\n"
        );
    }

    #[test]
    fn test_format_table_one_line_per_row() {
        let rows = vec![
            vec!["1".to_string(), "aks\npool".to_string(), "Ready".to_string()],
            vec!["2".to_string(), "b".to_string(), "Not\r\nReady".to_string()],
        ];
        let out = utils::format_table(&["ID", "NAME", "STATUS"], &rows);
        assert_eq!(out.lines().count(), 3);
        assert_eq!(
            out,
            "ID  NAME      STATUS\n1   aks pool  Ready\n2   b         Not  Ready\n"
        );
    }

    #[test]
    fn test_format_table_empty() {
        assert_eq!(utils::format_table(&["ID", "NAME"], &[]), "ID  NAME\n");
    }
}
