// Copyright 2025 John Brosnihan
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
//! Entity management
//!
//! Entities are plain indices into component storage. They carry no
//! generation: ids are only invalidated by a full world reset, which
//! discards every component along with them.

use std::fmt;

/// Handle to a simulated body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    /// Create an entity handle from a raw index
    pub fn new(index: u32) -> Self {
        Entity(index)
    }

    /// Index into component storage
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Raw id
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_index() {
        let entity = Entity::new(42);
        assert_eq!(entity.index(), 42);
        assert_eq!(entity.raw(), 42);
        assert_eq!(entity.to_string(), "Entity(42)");
    }

    #[test]
    fn test_entity_ordering() {
        assert!(Entity::new(1) < Entity::new(2));
        assert_eq!(Entity::new(3), Entity::new(3));
    }
}
