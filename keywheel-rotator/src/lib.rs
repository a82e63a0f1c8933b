//! API key rotation for outbound third-party calls
//!
//! Keeps a pool of interchangeable credentials, hands out the active one,
//! and steps past keys the upstream provider has rejected.
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


pub mod error;
pub mod mask;
pub mod rotator;
pub mod service_integration;

pub use error::{RotatorError, RotatorResult};
pub use mask::mask_key;
pub use rotator::{KeyRotator, KeyStatus, PoolSnapshot};
pub use service_integration::*;
