// ABOUTME: Integration tests for configuration discovery, parsing and merging.
// ABOUTME: Tests config file lookup, backend retry tuning and environment overrides.

use rollgate::config::*;
use rollgate::error::Error;
use rollgate::expose::ExposureKind;
use std::fs;
use std::path::Path;
use std::time::Duration;

const MINIMAL: &str = r#"
service: orders-api
backend:
  bucket: orders-tf-state
  table: orders-tf-locks
"#;

mod discovery {
    use super::*;

    #[test]
    fn finds_primary_file_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rollgate.yml"), MINIMAL).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.service.as_str(), "orders-api");
    }

    #[test]
    fn finds_yaml_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rollgate.yaml"), MINIMAL).unwrap();

        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn finds_dot_directory_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".rollgate")).unwrap();
        fs::write(dir.path().join(".rollgate/config.yml"), MINIMAL).unwrap();

        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn prefers_rollgate_yml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rollgate.yml"), MINIMAL).unwrap();
        fs::write(
            dir.path().join("rollgate.yaml"),
            MINIMAL.replace("orders-api", "billing"),
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.service.as_str(), "orders-api");
    }

    #[test]
    fn missing_config_is_reported_with_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(path) if path == dir.path()));
    }

    #[test]
    fn generated_template_is_loadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = init_config(dir.path(), Some("orders-api"), false).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.bucket().as_str(), "orders-api-terraform-state");
        assert_eq!(config.table().as_str(), "orders-api-terraform-locks");
        assert_eq!(config.manifests.unwrap().dir, Path::new("k8s"));
    }
}

mod parsing {
    use super::*;

    #[test]
    fn parse_full_config() {
        let yaml = r#"
service: orders-api
repository: shop/orders
region: eu-west-1
registry: 123456789012.dkr.ecr.eu-west-1.amazonaws.com
profile: deploy

backend:
  bucket: orders-tf-state
  table: orders-tf-locks
  state_key: shop/orders.tfstate
  retry:
    attempts: 4
    interval: 2s
    multiplier: 2.0
    max_interval: 10s

build:
  context: app
  dockerfile: app/Dockerfile.prod
  platform: linux/amd64
  scan: false
  create_repository: false

manifests:
  dir: deploy
  workload: orders.yaml
  service: orders-lb.yaml

workload:
  namespace: shop
  deployment: orders
  container: api
  selector: app.kubernetes.io/name=orders
  context: prod-cluster

exposure:
  service: orders-lb
  fallback_service: orders-np
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.repository().as_str(), "shop/orders");
        assert_eq!(config.state_key(), "shop/orders.tfstate");
        assert_eq!(config.profile.as_deref(), Some("deploy"));

        let retry = config.backend.retry;
        assert_eq!(retry.attempts, 4);
        assert_eq!(retry.interval, Duration::from_secs(2));
        assert_eq!(retry.max_interval, Duration::from_secs(10));

        let settings = config.publish_settings().unwrap();
        assert_eq!(settings.repository.as_str(), "shop/orders");
        assert_eq!(settings.platform.as_deref(), Some("linux/amd64"));
        assert!(!settings.scan);
        assert!(!settings.ensure_repository);

        let manifests = config.manifests.as_ref().unwrap();
        assert!(manifests.workload_files()[3].ends_with("orders.yaml"));
        assert!(manifests.service_file().ends_with("orders-lb.yaml"));

        let workload = config.workload_ref();
        assert_eq!(workload.deployment, "orders");
        assert_eq!(workload.container, "api");
        assert_eq!(workload.selector, "app.kubernetes.io/name=orders");
        assert_eq!(config.workload.context.as_deref(), Some("prod-cluster"));
    }

    #[test]
    fn missing_backend_returns_error() {
        assert!(Config::from_yaml("service: orders-api\n").is_err());
    }

    #[test]
    fn missing_service_returns_error() {
        let yaml = "backend:\n  bucket: a\n  table: b\n";
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn invalid_duration_returns_error() {
        let yaml = format!("{MINIMAL}rollout:\n  timeout: soon\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }
}

mod env_vars {
    use super::*;

    #[test]
    fn literal_and_reference_forms_parse() {
        let yaml = format!(
            "{MINIMAL}build:\n  args:\n    STAGE: prod\n    TOKEN: {{ env: ROLLGATE_IT_TOKEN, default: none }}\n"
        );
        let config = Config::from_yaml(&yaml).unwrap();

        assert_eq!(
            config.build.args.get("STAGE"),
            Some(&EnvValue::Literal("prod".to_string()))
        );
        assert_eq!(
            config.build.args.get("TOKEN"),
            Some(&EnvValue::FromEnv {
                var: "ROLLGATE_IT_TOKEN".to_string(),
                default: Some("none".to_string()),
            })
        );
    }

    #[test]
    fn resolve_env_map_uses_defaults() {
        let yaml = format!(
            "{MINIMAL}build:\n  args:\n    TOKEN: {{ env: ROLLGATE_IT_UNSET, default: none }}\n"
        );
        let config = Config::from_yaml(&yaml).unwrap();

        temp_env::with_var_unset("ROLLGATE_IT_UNSET", || {
            let resolved = resolve_env_map(&config.build.args).unwrap();
            assert_eq!(resolved.get("TOKEN").map(String::as_str), Some("none"));
        });
    }
}

mod environments {
    use super::*;

    const WITH_ENVIRONMENTS: &str = r#"
service: orders-api
region: eu-west-1
backend:
  bucket: orders-tf-state
  table: orders-tf-locks
manifests:
  dir: k8s
build:
  args:
    STAGE: prod
    REGION: eu
environments:
  staging:
    profile: staging
    table: orders-tf-locks-staging
    context: staging-cluster
    build_args:
      STAGE: staging
"#;

    #[test]
    fn select_without_environment_keeps_base() {
        let config = Config::from_yaml(WITH_ENVIRONMENTS)
            .unwrap()
            .select(None)
            .unwrap();
        assert_eq!(config.table().as_str(), "orders-tf-locks");
        assert!(config.profile.is_none());
    }

    #[test]
    fn environment_merges_over_base() {
        let config = Config::from_yaml(WITH_ENVIRONMENTS)
            .unwrap()
            .select(Some("staging"))
            .unwrap();

        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.profile.as_deref(), Some("staging"));
        assert_eq!(config.bucket().as_str(), "orders-tf-state");
        assert_eq!(config.table().as_str(), "orders-tf-locks-staging");
        assert_eq!(config.workload.context.as_deref(), Some("staging-cluster"));
        assert_eq!(
            config.build.args.get("STAGE"),
            Some(&EnvValue::Literal("staging".to_string()))
        );
        assert_eq!(
            config.build.args.get("REGION"),
            Some(&EnvValue::Literal("eu".to_string()))
        );
    }

    #[test]
    fn unknown_environment_returns_error() {
        let err = Config::from_yaml(WITH_ENVIRONMENTS)
            .unwrap()
            .select(Some("prod"))
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown environment: prod");
    }
}

mod exposure {
    use super::*;

    fn config_for(dir: &Path) -> Config {
        let yaml = format!(
            "{MINIMAL}manifests:\n  dir: {}\nexposure:\n  fallback_service: orders-api-np\n",
            dir.display()
        );
        Config::from_yaml(&yaml).unwrap()
    }

    #[test]
    fn both_manifests_give_primary_then_secondary() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("service.yaml"), "").unwrap();
        fs::write(dir.path().join("service-fallback.yaml"), "").unwrap();

        let strategies = config_for(dir.path()).exposure_strategies();
        let kinds: Vec<_> = strategies.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, [ExposureKind::Primary, ExposureKind::Secondary]);
        assert_eq!(strategies[0].service, "orders-api");
        assert_eq!(strategies[1].service, "orders-api-np");
    }

    #[test]
    fn secondary_alone_is_the_only_strategy() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("service-fallback.yaml"), "").unwrap();

        let strategies = config_for(dir.path()).exposure_strategies();
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].kind, ExposureKind::Secondary);
    }

    #[test]
    fn no_service_manifests_give_no_strategies() {
        let dir = tempfile::tempdir().unwrap();
        assert!(config_for(dir.path()).exposure_strategies().is_empty());
    }
}
