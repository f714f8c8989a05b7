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
//! System execution framework
//!
//! Systems contain the logic that operates on entities and components.
//! The simulation driver runs its systems in a fixed order once per substep,
//! lending each one the world and the substep duration.

use crate::ecs::World;

/// Trait for systems that operate on the ECS world
pub trait System {
    /// Execute the system on the world for one substep of length `dt`
    fn run(&mut self, world: &mut World, dt: f64);

    /// Get the name of this system for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingSystem {
        run_count: usize,
        elapsed: f64,
    }

    impl System for CountingSystem {
        fn run(&mut self, _world: &mut World, dt: f64) {
            self.run_count += 1;
            self.elapsed += dt;
        }

        fn name(&self) -> &str {
            "CountingSystem"
        }
    }

    #[test]
    fn test_system_runs_through_trait_object() {
        let mut world = World::new();
        let mut system = CountingSystem {
            run_count: 0,
            elapsed: 0.0,
        };

        {
            let dyn_system: &mut dyn System = &mut system;
            dyn_system.run(&mut world, 0.5);
            dyn_system.run(&mut world, 0.25);
            assert_eq!(dyn_system.name(), "CountingSystem");
        }
        assert_eq!(system.run_count, 2);
        assert_eq!(system.elapsed, 0.75);
    }
}
