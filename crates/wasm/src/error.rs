//! Error handling for WASM bindings.
//!
//! Converts Quire's error types into JavaScript-friendly errors.

use quire_core::{PackageError, RegistryError};
use quire_traits::ArchiveError;
use thiserror::Error;
use wasm_bindgen::prelude::*;

/// Error codes for TypeScript consumption.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid argument from JavaScript
    Config,
    /// Archive could not be read or written
    Archive,
    /// Name unusable as an archive entry or directory
    EntryName,
    /// Font family name already taken or empty
    NameConflict,
    /// Unknown font family or variant
    NotFound,
    /// Value could not cross the JS boundary
    Serialization,
}

impl ErrorCode {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Config => "CONFIG_ERROR",
            ErrorCode::Archive => "ARCHIVE_ERROR",
            ErrorCode::EntryName => "ENTRY_NAME_ERROR",
            ErrorCode::NameConflict => "NAME_CONFLICT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Serialization => "SERIALIZATION_ERROR",
        }
    }
}

/// A JavaScript-friendly error type.
///
/// Note: This is NOT a wasm_bindgen struct because we need custom
/// conversion to JavaScript Error objects.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct QuireError {
    code: ErrorCode,
    message: String,
}

impl QuireError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Config, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<RegistryError> for QuireError {
    fn from(err: RegistryError) -> Self {
        let code = match err {
            RegistryError::NameConflict(_) => ErrorCode::NameConflict,
            RegistryError::InvalidName { .. } => ErrorCode::EntryName,
            RegistryError::UnknownFamily(_) | RegistryError::VariantOutOfRange { .. } => ErrorCode::NotFound,
        };
        Self::new(code, err.to_string())
    }
}

impl From<ArchiveError> for QuireError {
    fn from(err: ArchiveError) -> Self {
        Self::new(ErrorCode::Archive, err.to_string())
    }
}

impl From<PackageError> for QuireError {
    fn from(err: PackageError) -> Self {
        match err {
            PackageError::Archive(e) => e.into(),
            PackageError::Registry(e) => e.into(),
            e @ PackageError::InvalidEntryName { .. } => Self::new(ErrorCode::EntryName, e.to_string()),
            e @ PackageError::EntryFailed { .. } => Self::new(ErrorCode::Archive, e.to_string()),
        }
    }
}

impl From<serde_wasm_bindgen::Error> for QuireError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::new(ErrorCode::Serialization, err.to_string())
    }
}

impl From<QuireError> for JsValue {
    fn from(err: QuireError) -> Self {
        let js_error = js_sys::Error::new(&err.message);

        // Add the error code as a property
        js_sys::Reflect::set(&js_error, &"code".into(), &JsValue::from_str(err.code.as_str())).ok();

        js_error.into()
    }
}
