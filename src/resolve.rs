//! Backend resolution.
//!
//! Resolution checks every document family once, registers the real backend
//! where it can be acquired and the dummy backend everywhere else. Each
//! degraded family produces exactly one [`FallbackNotice`], delivered to a
//! [`DiagnosticSink`] and kept on the [`Resolution`].

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::{
    self, BackendKind, DummyBackend, ExcelBackend, Family, PowerPointBackend, WordBackend,
};
use crate::error::{Error, Result};

/// Environment variable listing families forced to dummy mode.
pub const DUMMY_ENV: &str = "OFFICEKIT_DUMMY";

/// Options controlling backend resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveOptions {
    /// Families that always resolve to the dummy backend
    pub disabled: BTreeSet<Family>,
}

impl ResolveOptions {
    /// Create resolve options with defaults (nothing disabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Read options from the `OFFICEKIT_DUMMY` environment variable.
    ///
    /// The value is a comma separated list of family names, or `all`.
    /// Unknown names are skipped with a warning.
    pub fn from_env() -> Self {
        match std::env::var(DUMMY_ENV) {
            Ok(value) => Self::from_list(&value),
            Err(_) => Self::default(),
        }
    }

    /// Parse a comma separated family list such as `"word, excel"`.
    pub fn from_list(list: &str) -> Self {
        let mut options = Self::default();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if name.eq_ignore_ascii_case("all") {
                options = options.all_dummy();
                continue;
            }
            match name.parse::<Family>() {
                Ok(family) => options = options.disable(family),
                Err(_) => log::warn!("{}: ignoring unknown family '{}'", DUMMY_ENV, name),
            }
        }
        options
    }

    /// Parse options from JSON, e.g. `{"disabled": ["excel"]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Force one family to the dummy backend.
    pub fn disable(mut self, family: Family) -> Self {
        self.disabled.insert(family);
        self
    }

    /// Force every family to the dummy backend.
    pub fn all_dummy(mut self) -> Self {
        self.disabled.extend(Family::ALL);
        self
    }

    /// Union of both option sets.
    pub fn merge(mut self, other: ResolveOptions) -> Self {
        self.disabled.extend(other.disabled);
        self
    }

    /// Whether a family is forced to dummy mode.
    pub fn is_disabled(&self, family: Family) -> bool {
        self.disabled.contains(&family)
    }
}

/// Per-family capability flags, fixed once resolution is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Real Word backend in use
    pub word: bool,
    /// Real Excel backend in use
    pub excel: bool,
    /// Real PowerPoint backend in use
    pub powerpoint: bool,
}

impl Capabilities {
    /// Every family real.
    pub fn all_real() -> Self {
        Self {
            word: true,
            excel: true,
            powerpoint: true,
        }
    }

    /// Every family dummy.
    pub fn all_dummy() -> Self {
        Self {
            word: false,
            excel: false,
            powerpoint: false,
        }
    }

    /// Set the flag for one family.
    pub fn with(mut self, family: Family, real: bool) -> Self {
        match family {
            Family::Word => self.word = real,
            Family::Excel => self.excel = real,
            Family::PowerPoint => self.powerpoint = real,
        }
        self
    }

    /// Whether the family resolved to its real backend.
    pub fn is_real(&self, family: Family) -> bool {
        match family {
            Family::Word => self.word,
            Family::Excel => self.excel,
            Family::PowerPoint => self.powerpoint,
        }
    }

    /// Backend kind serving the family.
    pub fn kind(&self, family: Family) -> BackendKind {
        if self.is_real(family) {
            BackendKind::Real
        } else {
            BackendKind::Dummy
        }
    }

    /// Families running on the dummy backend, in resolution order.
    pub fn degraded(&self) -> Vec<Family> {
        Family::ALL
            .into_iter()
            .filter(|f| !self.is_real(*f))
            .collect()
    }
}

/// Backends bound to each family. Read-only after resolution.
#[derive(Clone)]
pub struct BackendRegistry {
    pub word: Arc<dyn WordBackend>,
    pub excel: Arc<dyn ExcelBackend>,
    pub powerpoint: Arc<dyn PowerPointBackend>,
}

impl BackendRegistry {
    /// Registry with the dummy backend for every family.
    pub fn dummy() -> Self {
        let dummy = Arc::new(DummyBackend::new());
        Self {
            word: dummy.clone(),
            excel: dummy.clone(),
            powerpoint: dummy,
        }
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("word", &self.word.name())
            .field("excel", &self.excel.name())
            .field("powerpoint", &self.powerpoint.name())
            .finish()
    }
}

/// A family fell back to the dummy backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackNotice {
    pub family: Family,
    pub reason: String,
}

impl fmt::Display for FallbackNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} backend unavailable ({}); using dummy backend, saved files will be placeholders",
            self.family, self.reason
        )
    }
}

/// Receiver of fallback notices.
pub trait DiagnosticSink: Send + Sync {
    fn fallback(&self, notice: &FallbackNotice);
}

/// Sink that forwards notices to `log::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn fallback(&self, notice: &FallbackNotice) {
        log::warn!("{}", notice);
    }
}

/// Result of resolving every family.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub capabilities: Capabilities,
    pub registry: BackendRegistry,
    pub notices: Vec<FallbackNotice>,
}

impl Resolution {
    /// Resolve with forced capability flags, reporting to [`LogSink`].
    ///
    /// A `true` flag is only honoured when the real backend is compiled in;
    /// otherwise the family falls back like in a normal resolution.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self::with_capabilities_and_sink(capabilities, Arc::new(LogSink))
    }

    /// [`Resolution::with_capabilities`] with an explicit sink.
    pub fn with_capabilities_and_sink(
        capabilities: Capabilities,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let options = Family::ALL
            .into_iter()
            .filter(|f| !capabilities.is_real(*f))
            .fold(ResolveOptions::new(), ResolveOptions::disable);
        Resolver::new(options).with_diagnostics(sink).resolve()
    }

    /// Backend kind serving the family.
    pub fn kind(&self, family: Family) -> BackendKind {
        self.capabilities.kind(family)
    }
}

/// Probes families and builds a [`Resolution`].
pub struct Resolver {
    options: ResolveOptions,
    sink: Arc<dyn DiagnosticSink>,
}

impl Resolver {
    /// Create a resolver reporting to [`LogSink`].
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            options,
            sink: Arc::new(LogSink),
        }
    }

    /// Send fallback notices to `sink` instead of the log.
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Resolve all families. Never fails; unavailable backends degrade.
    pub fn resolve(self) -> Resolution {
        let mut registry = BackendRegistry::dummy();
        let mut capabilities = Capabilities::all_dummy();
        let mut notices = Vec::new();

        for family in Family::ALL {
            let outcome = match family {
                Family::Word => self.acquire(family, backend::real_word).map(|b| registry.word = b),
                Family::Excel => self.acquire(family, backend::real_excel).map(|b| registry.excel = b),
                Family::PowerPoint => self
                    .acquire(family, backend::real_powerpoint)
                    .map(|b| registry.powerpoint = b),
            };

            match outcome {
                Ok(()) => {
                    capabilities = capabilities.with(family, true);
                    log::debug!("{}: real backend", family);
                }
                Err(Error::CapabilityUnavailable { family, reason }) => {
                    let notice = FallbackNotice { family, reason };
                    self.sink.fallback(&notice);
                    notices.push(notice);
                }
                Err(other) => {
                    let notice = FallbackNotice {
                        family,
                        reason: other.to_string(),
                    };
                    self.sink.fallback(&notice);
                    notices.push(notice);
                }
            }
        }

        Resolution {
            capabilities,
            registry,
            notices,
        }
    }

    fn acquire<B: ?Sized>(
        &self,
        family: Family,
        make: fn() -> Result<Arc<B>>,
    ) -> Result<Arc<B>> {
        if self.options.is_disabled(family) {
            return Err(Error::CapabilityUnavailable {
                family,
                reason: "disabled by configuration".to_string(),
            });
        }
        make()
    }
}
