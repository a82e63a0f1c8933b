//! Error types for key rotation
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use thiserror::Error;

/// Key rotation errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatorError {
    /// The pool holds no keys at all. Only `add_key` can recover from this.
    #[error("No API keys available")]
    EmptyPool,

    /// The pool has keys but every one of them is flagged invalid.
    #[error("No valid API keys available")]
    NoValidKeys,
}

/// Result type for rotation operations
pub type RotatorResult<T> = Result<T, RotatorError>;
