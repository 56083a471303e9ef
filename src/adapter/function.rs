//! Adapter function definitions

use super::instruction::Instruction;
use super::types::ValType;
use super::validate::{validate_body, ValidationError};
use super::Config;
use serde::Serialize;

/// A validated adapter function.
///
/// Immutable after construction; the executor borrows it for each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterFunction {
    name: Option<String>,
    params: Vec<ValType>,
    results: Vec<ValType>,
    body: Vec<Instruction>,
    max_stack_depth: usize,
}

/// Serializable view of an adapter's signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterSignature {
    pub name: Option<String>,
    pub params: Vec<ValType>,
    pub results: Vec<ValType>,
    pub max_stack_depth: usize,
    pub body: Vec<String>,
}

impl AdapterFunction {
    /// Build an adapter with default limits. See [`AdapterFunction::with_config`].
    pub fn new(
        name: Option<String>,
        params: Vec<ValType>,
        results: Vec<ValType>,
        body: Vec<Instruction>,
    ) -> Result<Self, ValidationError> {
        Self::with_config(name, params, results, body, &Config::default())
    }

    /// Build and validate an adapter.
    ///
    /// # Errors
    /// Any malformed body (out-of-range `arg.get`, operand type mismatch,
    /// results that differ from the signature, stack deeper than the limit).
    pub fn with_config(
        name: Option<String>,
        params: Vec<ValType>,
        results: Vec<ValType>,
        body: Vec<Instruction>,
        config: &Config,
    ) -> Result<Self, ValidationError> {
        let max_stack_depth = validate_body(&params, &results, &body, config)?;
        log::debug!(
            "validated adapter {} ({} instructions, max stack depth {})",
            name.as_deref().unwrap_or("<anonymous>"),
            body.len(),
            max_stack_depth
        );
        Ok(AdapterFunction {
            name,
            params,
            results,
            body,
            max_stack_depth,
        })
    }

    /// Export name, if the adapter is exported.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn params(&self) -> &[ValType] {
        &self.params
    }

    pub fn results(&self) -> &[ValType] {
        &self.results
    }

    pub fn body(&self) -> &[Instruction] {
        &self.body
    }

    pub fn max_stack_depth(&self) -> usize {
        self.max_stack_depth
    }

    pub fn signature(&self) -> AdapterSignature {
        AdapterSignature {
            name: self.name.clone(),
            params: self.params.clone(),
            results: self.results.clone(),
            max_stack_depth: self.max_stack_depth,
            body: self.body.iter().map(|i| i.mnemonic()).collect(),
        }
    }
}
