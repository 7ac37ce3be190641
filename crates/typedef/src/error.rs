// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("xml parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("xml attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("port is missing its mandatory Name attribute (check the .fbt file)")]
    MissingName,

    #[error("{0}")]
    Utf8(#[from] std::str::Utf8Error),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown FB type: {0}")]
    UnknownType(String),

    #[error("io error scanning resources directory: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RegistryError> for fbrt_core::Error {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::UnknownType(t) => fbrt_core::Error::UnknownType(t),
            RegistryError::Io(e) => fbrt_core::Error::DefinitionParseError(e.to_string()),
        }
    }
}

impl From<DefinitionError> for fbrt_core::Error {
    fn from(e: DefinitionError) -> Self {
        fbrt_core::Error::DefinitionParseError(e.to_string())
    }
}
