//! # Repository Registry
//!
//! Typed container of repository instances, filled once at startup and
//! read-only afterwards.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Startup (single task)                 Serving (many tasks)             │
//! │  ─────────────────────                 ────────────────────             │
//! │  RegistryBuilder::new()                Arc<RepositoryRegistry>          │
//! │    .register(AUTH,    Auth(..))?         .retrieve::<dyn R>(id)?        │
//! │    .register(CLIENT,  Client(..))?       .auth()? .clients()?           │
//! │    .register(PRODUCT, Product(..))?      .products()?                   │
//! │    .build()  ─────── frozen ─────────►                                  │
//! │                                                                         │
//! │  Kind mismatch / duplicate id          Absent id / wrong capability     │
//! │      → CoreError::Configuration            → CoreError::Configuration   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No interior mutability: once built, concurrent reads need no locking.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use freight_core::{CoreError, CoreResult};

use crate::repository::{AuthRepository, ClientRepository, ProductRepository};

// =============================================================================
// Keys
// =============================================================================

/// Closed set of registry keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryId {
    Auth,
    Client,
    Product,
}

impl RepositoryId {
    pub const ALL: [RepositoryId; 3] = [RepositoryId::Auth, RepositoryId::Client, RepositoryId::Product];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepositoryId::Auth => "AUTH",
            RepositoryId::Client => "CLIENT",
            RepositoryId::Product => "PRODUCT",
        }
    }
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepositoryId {
    type Err = CoreError;

    /// Case-sensitive: only "AUTH", "CLIENT" and "PRODUCT" are keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RepositoryId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CoreError::configuration(format!("unknown repository id '{s}'")))
    }
}

// =============================================================================
// Handles
// =============================================================================

/// A registered repository instance, tagged with its capability.
#[derive(Clone)]
pub enum RepositoryHandle {
    Auth(Arc<dyn AuthRepository>),
    Client(Arc<dyn ClientRepository>),
    Product(Arc<dyn ProductRepository>),
}

impl RepositoryHandle {
    /// The registry key this handle belongs under.
    pub fn kind(&self) -> RepositoryId {
        match self {
            RepositoryHandle::Auth(_) => RepositoryId::Auth,
            RepositoryHandle::Client(_) => RepositoryId::Client,
            RepositoryHandle::Product(_) => RepositoryId::Product,
        }
    }
}

impl fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepositoryHandle({})", self.kind())
    }
}

/// Capability that can be pulled out of a [`RepositoryHandle`].
///
/// Implemented for the repository trait objects, so callers write
/// `registry.retrieve::<dyn ProductRepository>(RepositoryId::Product)`.
pub trait RegisteredRepository: Send + Sync {
    /// Key under which this capability is normally registered.
    const KIND: RepositoryId;

    fn from_handle(handle: &RepositoryHandle) -> Option<Arc<Self>>;
}

impl RegisteredRepository for dyn AuthRepository {
    const KIND: RepositoryId = RepositoryId::Auth;

    fn from_handle(handle: &RepositoryHandle) -> Option<Arc<Self>> {
        match handle {
            RepositoryHandle::Auth(repo) => Some(Arc::clone(repo)),
            _ => None,
        }
    }
}

impl RegisteredRepository for dyn ClientRepository {
    const KIND: RepositoryId = RepositoryId::Client;

    fn from_handle(handle: &RepositoryHandle) -> Option<Arc<Self>> {
        match handle {
            RepositoryHandle::Client(repo) => Some(Arc::clone(repo)),
            _ => None,
        }
    }
}

impl RegisteredRepository for dyn ProductRepository {
    const KIND: RepositoryId = RepositoryId::Product;

    fn from_handle(handle: &RepositoryHandle) -> Option<Arc<Self>> {
        match handle {
            RepositoryHandle::Product(repo) => Some(Arc::clone(repo)),
            _ => None,
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Mutable phase of the registry. Consumed by [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<RepositoryId, RepositoryHandle>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` under `id`.
    ///
    /// Fails when the handle's capability does not match `id` or when `id`
    /// is already taken.
    pub fn register(mut self, id: RepositoryId, handle: RepositoryHandle) -> CoreResult<Self> {
        if handle.kind() != id {
            return Err(CoreError::configuration(format!(
                "cannot register a {} repository under {id}",
                handle.kind()
            )));
        }
        if self.entries.contains_key(&id) {
            return Err(CoreError::configuration(format!(
                "repository {id} is already registered"
            )));
        }

        self.entries.insert(id, handle);
        Ok(self)
    }

    /// Freezes the registry.
    pub fn build(self) -> RepositoryRegistry {
        RepositoryRegistry {
            entries: self.entries,
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Read-only registry shared by every request.
#[derive(Debug, Clone)]
pub struct RepositoryRegistry {
    entries: HashMap<RepositoryId, RepositoryHandle>,
}

impl RepositoryRegistry {
    /// Looks up `id` and checks it provides capability `R`.
    ///
    /// ## Errors
    /// `CoreError::Configuration` if `id` was never registered or holds a
    /// different capability.
    pub fn retrieve<R>(&self, id: RepositoryId) -> CoreResult<Arc<R>>
    where
        R: RegisteredRepository + ?Sized,
    {
        let handle = self
            .entries
            .get(&id)
            .ok_or_else(|| CoreError::configuration(format!("repository {id} is not registered")))?;

        R::from_handle(handle).ok_or_else(|| {
            CoreError::configuration(format!(
                "repository {id} is a {} repository, expected {}",
                handle.kind(),
                R::KIND
            ))
        })
    }

    pub fn auth(&self) -> CoreResult<Arc<dyn AuthRepository>> {
        self.retrieve::<dyn AuthRepository>(RepositoryId::Auth)
    }

    pub fn clients(&self) -> CoreResult<Arc<dyn ClientRepository>> {
        self.retrieve::<dyn ClientRepository>(RepositoryId::Client)
    }

    pub fn products(&self) -> CoreResult<Arc<dyn ProductRepository>> {
        self.retrieve::<dyn ProductRepository>(RepositoryId::Product)
    }

    pub fn contains(&self, id: RepositoryId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
