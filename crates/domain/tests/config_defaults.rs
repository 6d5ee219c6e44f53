use aegis_domain::config::{Config, ConfigSeverity};

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
}

#[test]
fn explicit_zero_host_parses() {
    let toml_str = r#"
[server]
host = "0.0.0.0"
port = 8080
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
fn default_cors_allows_only_localhost() {
    let config = Config::default();
    assert!(!config.server.cors.allowed_origins.is_empty());
    assert!(config.server.cors.allowed_origins.contains(&"http://localhost:*".to_string()));
    assert!(config.server.cors.allowed_origins.contains(&"http://127.0.0.1:*".to_string()));
}

#[test]
fn empty_toml_parses_full_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.toolsrv.command, "aegis-toolsrv");
    assert_eq!(config.provider.model, "gemini-2.0-flash-exp");
    assert!(config.validate().is_empty());
}

#[test]
fn zero_port_fails_validation() {
    let config: Config = toml::from_str("[server]\nport = 0\n").unwrap();
    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.field == "server.port" && e.severity == ConfigSeverity::Error));
}

#[test]
fn empty_toolsrv_command_fails_validation() {
    let config: Config = toml::from_str("[toolsrv]\ncommand = \"\"\n").unwrap();
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.field == "toolsrv.command"));
}

#[test]
fn cors_wildcard_warns() {
    let config: Config = toml::from_str("[server.cors]\nallowed_origins = [\"*\"]\n").unwrap();
    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.severity == ConfigSeverity::Warning
            && e.field == "server.cors.allowed_origins"));
}

#[test]
fn toolsrv_section_parses() {
    let toml_str = r#"
[toolsrv]
command = "node"
args = ["dist/mcp/mcp-server.js"]

[toolsrv.env]
NODE_ENV = "production"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.toolsrv.command, "node");
    assert_eq!(config.toolsrv.args.len(), 1);
    assert_eq!(config.toolsrv.env.get("NODE_ENV").unwrap(), "production");
}
