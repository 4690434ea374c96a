//! Builder registry: maps event and request codes to message builders.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use protocol16::{ParameterError, ParameterTable, EVENT_CODE_PARAMETER};

/// Header byte of entity-move events. These are routed by the header even
/// when parameter 252 carries a different code.
pub const MOVE_EVENT_HEADER_CODE: u8 = 3;

/// Builds a domain message from a parameter table.
pub type BuildFn<M> = fn(&ParameterTable) -> Result<M, ParameterError>;

/// Which table a code is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
    Event,
    Request,
}

/// Errors raised while assembling a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A builder is already registered for this code.
    DuplicateCode { kind: BuilderKind, code: u16 },
}

impl fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event => write!(f, "event"),
            Self::Request => write!(f, "request"),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCode { kind, code } => {
                write!(f, "duplicate {kind} builder for code {code}")
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Mutable registry used during startup. Freeze it with [`build`](Self::build).
pub struct RegistryBuilder<M> {
    events: HashMap<u16, BuildFn<M>>,
    requests: HashMap<u16, BuildFn<M>>,
    header_routed: BTreeSet<u8>,
}

impl<M> RegistryBuilder<M> {
    /// Starts with no builders; [`MOVE_EVENT_HEADER_CODE`] is header-routed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
            requests: HashMap::new(),
            header_routed: BTreeSet::from([MOVE_EVENT_HEADER_CODE]),
        }
    }

    /// Routes events with this header byte by the header, ignoring 252.
    pub fn route_event_by_header(&mut self, header_code: u8) -> &mut Self {
        self.header_routed.insert(header_code);
        self
    }

    pub fn register_event(
        &mut self,
        code: u16,
        build: BuildFn<M>,
    ) -> Result<&mut Self, RegistryError> {
        Self::register(&mut self.events, BuilderKind::Event, code, build)?;
        Ok(self)
    }

    pub fn register_request(
        &mut self,
        code: u16,
        build: BuildFn<M>,
    ) -> Result<&mut Self, RegistryError> {
        Self::register(&mut self.requests, BuilderKind::Request, code, build)?;
        Ok(self)
    }

    fn register(
        table: &mut HashMap<u16, BuildFn<M>>,
        kind: BuilderKind,
        code: u16,
        build: BuildFn<M>,
    ) -> Result<(), RegistryError> {
        if table.contains_key(&code) {
            return Err(RegistryError::DuplicateCode { kind, code });
        }
        table.insert(code, build);
        Ok(())
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> BuilderRegistry<M> {
        BuilderRegistry {
            events: self.events,
            requests: self.requests,
            header_routed: self.header_routed,
        }
    }
}

impl<M> Default for RegistryBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable code -> builder lookup.
pub struct BuilderRegistry<M> {
    events: HashMap<u16, BuildFn<M>>,
    requests: HashMap<u16, BuildFn<M>>,
    header_routed: BTreeSet<u8>,
}

impl<M> BuilderRegistry<M> {
    /// A registry with no builders: every message decodes as unhandled.
    #[must_use]
    pub fn empty() -> Self {
        RegistryBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder<M> {
        RegistryBuilder::new()
    }

    #[must_use]
    pub fn event(&self, code: u16) -> Option<BuildFn<M>> {
        self.events.get(&code).copied()
    }

    #[must_use]
    pub fn request(&self, code: u16) -> Option<BuildFn<M>> {
        self.requests.get(&code).copied()
    }

    /// Resolves the routing code of an event.
    ///
    /// Header-routed bytes win; otherwise parameter 252, when integral and in
    /// `u16` range, overrides the header byte.
    #[must_use]
    pub fn event_code(&self, header_code: u8, parameters: &ParameterTable) -> u16 {
        if self.header_routed.contains(&header_code) {
            return u16::from(header_code);
        }
        parameters
            .code(EVENT_CODE_PARAMETER)
            .unwrap_or_else(|| u16::from(header_code))
    }

    /// Registered event codes in ascending order.
    #[must_use]
    pub fn event_codes(&self) -> Vec<u16> {
        sorted_codes(&self.events)
    }

    /// Registered request codes in ascending order.
    #[must_use]
    pub fn request_codes(&self) -> Vec<u16> {
        sorted_codes(&self.requests)
    }
}

fn sorted_codes<M>(table: &HashMap<u16, BuildFn<M>>) -> Vec<u16> {
    let mut codes: Vec<u16> = table.keys().copied().collect();
    codes.sort_unstable();
    codes
}

impl<M> Clone for BuilderRegistry<M> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            requests: self.requests.clone(),
            header_routed: self.header_routed.clone(),
        }
    }
}

impl<M> fmt::Debug for BuilderRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("events", &self.event_codes())
            .field("requests", &self.request_codes())
            .field("header_routed", &self.header_routed)
            .finish()
    }
}

impl<M> fmt::Debug for RegistryBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("events", &sorted_codes(&self.events))
            .field("requests", &sorted_codes(&self.requests))
            .field("header_routed", &self.header_routed)
            .finish()
    }
}
