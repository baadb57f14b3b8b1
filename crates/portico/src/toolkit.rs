//! The configured Portico toolkit.
//!
//! [`Portico`] assembles a [`Realizer`] and a naming policy from a
//! [`PorticoConfig`]: the built-in timing and logging stages are installed
//! globally when enabled, followed by any custom stages.
//!
//! ```text
//! PorticoConfig ─┬─ naming ────────► ContractBuilder (per contract)
//!                ├─ interception ──► Realizer global stages
//!                └─ telemetry ─────► init_telemetry
//! ```

use portico_config::{ConfigError, ConfigLoader, PorticoConfig, DEFAULT_ENV_PREFIX};
use portico_core::{BaseContract, ContractBuilder};
use portico_intercept::stages::{LoggingInterceptor, MetricsSink, TimingInterceptor, TimingSink};
use portico_intercept::{BoxedInterceptor, Interceptor};
use portico_runtime::{Realizer, TypeRegistry};
use portico_telemetry::TelemetryResult;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A realizer and naming policy assembled from configuration.
pub struct Portico {
    config: PorticoConfig,
    realizer: Realizer,
}

impl Portico {
    /// Creates a toolkit from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::assemble(PorticoConfig::default(), PorticoBuilder::new())
    }

    /// Creates a new toolkit builder.
    #[must_use]
    pub fn builder() -> PorticoBuilder {
        PorticoBuilder::new()
    }

    /// Creates a toolkit from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn from_config(config: PorticoConfig) -> Result<Self, ConfigError> {
        Self::builder().config(config).build()
    }

    /// Loads configuration from an optional file and `PORTICO__*` overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or validation fails.
    pub fn from_env(file: Option<&str>) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new().with_dotenv()?;
        if let Some(path) = file {
            loader = loader.with_file(path)?;
        }
        let config = loader.with_env_prefix(DEFAULT_ENV_PREFIX).load()?;
        Self::from_config(config)
    }

    /// Returns the configuration this toolkit was built from.
    #[must_use]
    pub fn config(&self) -> &PorticoConfig {
        &self.config
    }

    /// Returns the realizer.
    #[must_use]
    pub fn realizer(&self) -> &Realizer {
        &self.realizer
    }

    /// Starts a contract on the default endpoint base, named by the
    /// configured policy.
    #[must_use]
    pub fn contract(&self) -> ContractBuilder {
        self.contract_for(BaseContract::default())
    }

    /// Starts a contract on the given base, named by the configured policy.
    #[must_use]
    pub fn contract_for(&self, base: BaseContract) -> ContractBuilder {
        ContractBuilder::for_contract(base, self.config.naming.policy())
    }

    /// Installs the configured logging subscriber and metrics recorder.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError` if either subsystem is already installed or
    /// misconfigured.
    pub fn init_telemetry(&self) -> TelemetryResult<()> {
        portico_telemetry::init_telemetry(&self.config.telemetry.to_telemetry_config())
    }

    fn assemble(config: PorticoConfig, parts: PorticoBuilder) -> Self {
        let mut realizer = Realizer::builder();
        if let Some(registry) = parts.registry {
            realizer = realizer.registry(registry);
        }
        if config.interception.timing {
            let sink = parts.timing_sink.unwrap_or_else(|| Arc::new(MetricsSink));
            realizer = realizer.stage(TimingInterceptor::with_sink(sink));
        }
        if config.interception.logging {
            realizer = realizer.stage(LoggingInterceptor::new());
        }
        for stage in parts.stages {
            realizer = realizer.shared_stage(stage);
        }
        for (operation, stage) in parts.operation_stages {
            realizer = realizer.shared_operation_stage(operation, stage);
        }

        let realizer = realizer.build();
        debug!(
            stages = ?realizer.global_pipeline().stage_names(),
            "Portico assembled"
        );
        Self { config, realizer }
    }
}

impl Default for Portico {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Portico {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Portico")
            .field("config", &self.config)
            .field("realizer", &self.realizer)
            .finish()
    }
}

/// Builder for [`Portico`].
#[derive(Default)]
pub struct PorticoBuilder {
    config: Option<PorticoConfig>,
    registry: Option<Arc<TypeRegistry>>,
    timing_sink: Option<Arc<dyn TimingSink>>,
    stages: Vec<BoxedInterceptor>,
    operation_stages: Vec<(String, BoxedInterceptor)>,
}

impl PorticoBuilder {
    /// Creates a builder using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: PorticoConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Shares an existing type registry.
    #[must_use]
    pub fn registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sends timing samples to `sink` instead of the metrics recorder.
    #[must_use]
    pub fn timing_sink(mut self, sink: Arc<dyn TimingSink>) -> Self {
        self.timing_sink = Some(sink);
        self
    }

    /// Appends a global stage after the built-in ones.
    #[must_use]
    pub fn stage<I: Interceptor>(mut self, interceptor: I) -> Self {
        self.stages.push(Arc::new(interceptor));
        self
    }

    /// Appends a stage for operations named `operation`.
    #[must_use]
    pub fn operation_stage<I: Interceptor>(
        mut self,
        operation: impl Into<String>,
        interceptor: I,
    ) -> Self {
        self.operation_stages
            .push((operation.into(), Arc::new(interceptor)));
        self
    }

    /// Validates the configuration and assembles the toolkit.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn build(mut self) -> Result<Portico, ConfigError> {
        let config = self.config.take().unwrap_or_default();
        config.validate()?;
        Ok(Portico::assemble(config, self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_config::{InterceptionConfig, NamingConfig};
    use portico_intercept::stages::MemorySink;
    use portico_intercept::{Call, FnInterceptor};

    #[test]
    fn test_default_stages() {
        let portico = Portico::new();
        assert_eq!(
            portico.realizer().global_pipeline().stage_names(),
            ["timing", "logging"]
        );
    }

    #[test]
    fn test_interception_config_controls_stages() {
        let config = PorticoConfig::builder()
            .interception(InterceptionConfig {
                timing: false,
                logging: true,
            })
            .build();
        let portico = Portico::builder()
            .config(config)
            .stage(FnInterceptor::new("audit", |call: Call<'_>| call.proceed()))
            .build()
            .unwrap();

        assert_eq!(
            portico.realizer().global_pipeline().stage_names(),
            ["logging", "audit"]
        );
    }

    #[test]
    fn test_operation_stages_follow_globals() {
        let portico = Portico::builder()
            .timing_sink(Arc::new(MemorySink::new()))
            .operation_stage("sayHello", FnInterceptor::new("local", |call: Call<'_>| call.proceed()))
            .build()
            .unwrap();

        assert_eq!(
            portico.realizer().pipeline_for("sayHello").stage_names(),
            ["timing", "logging", "local"]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PorticoConfig::builder()
            .naming(NamingConfig {
                suffix_length: 2,
                ..Default::default()
            })
            .build();
        assert!(Portico::from_config(config).is_err());
    }

    #[test]
    fn test_contract_uses_configured_naming() {
        let config = PorticoConfig::builder()
            .naming(NamingConfig {
                fixed_name: Some("com.acme.Fixed".to_string()),
                ..Default::default()
            })
            .build();
        let portico = Portico::from_config(config).unwrap();

        let blueprint = portico.contract().build().unwrap();
        assert_eq!(blueprint.draw_name(), "com.acme.Fixed");
    }
}
