//! Credential masking for log output
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


const VISIBLE_CHARS: usize = 4;

/// Render a credential so it can be logged without leaking it.
///
/// Short keys are fully hidden; longer keys keep a few characters at each
/// end so operators can tell them apart.
pub fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "<unset>".to_string();
    }

    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= VISIBLE_CHARS * 2 {
        return "****".to_string();
    }

    let head: String = chars.iter().take(VISIBLE_CHARS).collect();
    let tail: String = chars[chars.len() - VISIBLE_CHARS..].iter().collect();
    format!("{}…{}", head, tail)
}
