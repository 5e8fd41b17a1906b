// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type for the form layer.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Object type \"{id}\" is already registered.")]
    AlreadyRegistered { id: String },

    #[error("form has no field \"{test_subj}\"")]
    UnknownField { test_subj: String },

    #[error("field \"{test_subj}\" is read-only")]
    ReadOnly { test_subj: String },
}
