//! # Schema Registry
//!
//! Name-based dispatch over every known message type.
//!
//! A registry is assembled once with [`SchemaRegistry::builder`] and is
//! immutable afterwards, so lookups need no locking. Callers that want a
//! process-wide instance install it exactly once with [`install_global`]
//! and read it back with [`global`].
//!
//! ```rust
//! use zktx_codec::messages::{QueryCounterResponse, QueryParamsResponse};
//! use zktx_codec::registry::SchemaRegistry;
//!
//! let registry = SchemaRegistry::builder()
//!     .register::<QueryCounterResponse>()?
//!     .register::<QueryParamsResponse>()?
//!     .build();
//!
//! let msg = registry.decode("hyle.hyle.zktx.v1.QueryCounterResponse", &[0x08, 0xAC, 0x02])?;
//! let resp = msg.downcast_ref::<QueryCounterResponse>().map(|r| r.counter);
//! assert_eq!(resp, Some(300));
//! # Ok::<(), zktx_codec::CodecError>(())
//! ```

use crate::config::DecodeConfig;
use crate::core::message::{DynMessage, Message};
use crate::core::schema::FieldInfo;
use crate::error::{constants, CodecError, Result};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

type DecodeFn = fn(&[u8], &DecodeConfig) -> Result<Box<dyn DynMessage>>;

fn decode_boxed<M: Message>(buf: &[u8], config: &DecodeConfig) -> Result<Box<dyn DynMessage>> {
    Ok(Box::new(M::decode_with(buf, config)?))
}

/// Everything the registry knows about one message type
#[derive(Clone)]
pub struct RegisteredType {
    name: &'static str,
    fields: Vec<FieldInfo>,
    decode: DecodeFn,
}

impl RegisteredType {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Field summaries in declaration order
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }
}

impl fmt::Debug for RegisteredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Immutable map from fully qualified type name to decoder
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    types: HashMap<&'static str, RegisteredType>,
    config: DecodeConfig,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder {
            types: HashMap::new(),
            config: DecodeConfig::default(),
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&RegisteredType> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.types.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Limits applied by [`SchemaRegistry::decode`]
    pub fn decode_config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode `buf` as the message registered under `type_name`.
    ///
    /// # Errors
    /// - `UnknownType` if nothing is registered under `type_name`
    /// - any decode error for the payload
    pub fn decode(&self, type_name: &str, buf: &[u8]) -> Result<Box<dyn DynMessage>> {
        let entry = self.types.get(type_name).ok_or_else(|| {
            debug!(type_name, "Decode requested for unregistered type");
            CodecError::UnknownType(type_name.to_string())
        })?;
        (entry.decode)(buf, &self.config)
    }
}

/// Collects types for a [`SchemaRegistry`]
#[derive(Debug)]
pub struct SchemaRegistryBuilder {
    types: HashMap<&'static str, RegisteredType>,
    config: DecodeConfig,
}

impl SchemaRegistryBuilder {
    /// Add `M` after validating its schema.
    ///
    /// # Errors
    /// - `DuplicateType` if `M::TYPE_NAME` is already registered
    /// - `InvalidSchema` if the schema has bad or repeated field numbers
    pub fn register<M: Message>(mut self) -> Result<Self> {
        if self.types.contains_key(M::TYPE_NAME) {
            return Err(CodecError::DuplicateType(M::TYPE_NAME));
        }

        let schema = M::schema();
        schema.validate()?;
        self.types.insert(
            M::TYPE_NAME,
            RegisteredType {
                name: M::TYPE_NAME,
                fields: schema.field_infos(),
                decode: decode_boxed::<M>,
            },
        );
        Ok(self)
    }

    /// Limits used by the built registry's `decode`
    pub fn decode_config(mut self, config: DecodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> SchemaRegistry {
        debug!(types = self.types.len(), "Schema registry built");
        SchemaRegistry {
            types: self.types,
            config: self.config,
        }
    }
}

static GLOBAL: OnceCell<SchemaRegistry> = OnceCell::new();

/// Install the process-wide registry.
///
/// # Errors
/// `ConfigError` if a registry was already installed
pub fn install_global(registry: SchemaRegistry) -> Result<&'static SchemaRegistry> {
    let types = registry.len();
    GLOBAL.set(registry).map_err(|_| {
        CodecError::ConfigError(constants::ERR_GLOBAL_REGISTRY_INSTALLED.to_string())
    })?;
    info!(types, "Global schema registry installed");
    GLOBAL
        .get()
        .ok_or_else(|| CodecError::ConfigError(constants::ERR_GLOBAL_REGISTRY_INSTALLED.to_string()))
}

/// The process-wide registry, if one was installed
pub fn global() -> Option<&'static SchemaRegistry> {
    GLOBAL.get()
}
